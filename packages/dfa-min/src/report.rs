use colored::Colorize;
use dfa_min_lib::{
    automaton::{AutomatonNode, dfa::DFA},
    config::ReportConfig,
    minimizer::MinimizationResult,
};

fn state_list<N: AutomatonNode>(states: &[N]) -> String {
    if states.is_empty() {
        return "-".to_string();
    }

    states
        .iter()
        .map(|state| format!("{:?}", state))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prints the transition table of `dfa`. The start state is marked with `->`,
/// accepting states with `*`.
fn print_table<N: AutomatonNode>(title: &str, dfa: &DFA<N, char>) {
    println!("{}", title.bold());

    let mut header = format!("{:>8}", "");
    for letter in dfa.alphabet() {
        header.push_str(&format!("{:>6}", letter));
    }
    println!("{}", header.dimmed());

    for state in dfa.states() {
        let marker = match (state == dfa.start(), dfa.is_accepting(state)) {
            (true, true) => "->*",
            (true, false) => "-> ",
            (false, true) => "  *",
            (false, false) => "   ",
        };
        let name = format!("{} {:>4}", marker, format!("{:?}", dfa.state_data(state)));

        let mut row = if dfa.is_accepting(state) {
            name.green().to_string()
        } else {
            name
        };
        for letter in dfa.alphabet() {
            let target = dfa
                .transition(state, letter)
                .map(|target| format!("{:?}", dfa.state_data(target)))
                .unwrap_or_else(|| "-".to_string());
            row.push_str(&format!("{:>6}", target));
        }
        println!("{}", row);
    }
    println!();
}

pub fn print_report(
    input: &DFA<u32, char>,
    result: &MinimizationResult<u32, char>,
    config: &ReportConfig,
) {
    if *config.get_show_table() {
        print_table("Input DFA", input);
    }

    if *config.get_show_reachable() {
        println!("{}", "Reachable states".bold());
        println!(
            "  accepting:     {}",
            state_list(&result.reachable.accepting).green()
        );
        println!("  non-accepting: {}", state_list(&result.reachable.non_accepting));
        if result.statistics.removed_unreachable > 0 {
            println!(
                "  {}",
                format!(
                    "{} unreachable state(s) removed",
                    result.statistics.removed_unreachable
                )
                .yellow()
            );
        }
        println!();
    }

    if *config.get_show_partition() {
        println!(
            "{} {}",
            "Final partition".bold(),
            format!("({} rounds)", result.statistics.rounds).dimmed()
        );
        for (label, block) in result.partition.iter().enumerate() {
            println!("  {:>3}: {{{}}}", label, state_list(block));
        }
        println!();
    }

    if *config.get_show_table() {
        print_table("Minimized DFA", &result.minimized);
    }

    println!(
        "{} {} -> {} states",
        "Result:".bold(),
        result.statistics.state_count,
        result.statistics.minimized_count.to_string().green()
    );
}
