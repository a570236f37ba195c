//! Procedural macros for `dfa-min-lib`.
//!
//! The only macro is [`config!`](macro@config), which turns a compact struct
//! declaration with default values into a configuration struct that can be
//! loaded from (partial) TOML files.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Attribute, Expr, GenericArgument, Ident, PathArguments, Token, Type, Visibility,
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
    token,
};

/// One `name: Type = default` entry of a `config!` block.
///
/// Nested configuration structs name the type used in the partial struct
/// explicitly: `name: Type (PartialType = default)`.
struct ConfigField {
    attrs: Vec<Attribute>,
    name: Ident,
    ty: Type,
    default_value: Expr,
    partial_ty: Option<Type>,
}

impl Parse for ConfigField {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let name: Ident = input.parse()?;
        input.parse::<Token![:]>()?;
        let ty: Type = input.parse()?;

        let (partial_ty, default_value) = if input.peek(token::Paren) {
            let content;
            syn::parenthesized!(content in input);
            let partial_ty: Type = content.parse()?;
            content.parse::<Token![=]>()?;
            (Some(partial_ty), content.parse::<Expr>()?)
        } else {
            input.parse::<Token![=]>()?;
            (None, input.parse::<Expr>()?)
        };

        Ok(ConfigField {
            attrs,
            name,
            ty,
            default_value,
            partial_ty,
        })
    }
}

struct ConfigInput {
    vis: Visibility,
    name: Ident,
    fields: Punctuated<ConfigField, Token![,]>,
}

impl Parse for ConfigInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let vis: Visibility = input.parse()?;
        input.parse::<Token![struct]>()?;
        let name: Ident = input.parse()?;
        let content;
        syn::braced!(content in input);
        let fields = content.parse_terminated(ConfigField::parse, Token![,])?;
        Ok(ConfigInput { vis, name, fields })
    }
}

/// Checks whether a type is spelled `Option<T>`, so partial fields are not
/// wrapped twice.
fn is_option(ty: &Type) -> bool {
    if let Type::Path(tp) = ty
        && let Some(seg) = tp.path.segments.last()
        && seg.ident == "Option"
        && let PathArguments::AngleBracketed(args) = &seg.arguments
    {
        return args.args.len() == 1 && matches!(args.args[0], GenericArgument::Type(_));
    }
    false
}

/// How a field is stored in the partial struct and resolved against its
/// default.
enum FieldKind {
    /// `T`, read as `Option<T>`.
    Plain,
    /// `Option<T>`, read as is; a missing value falls back to the default.
    Optional,
    /// A nested config, read as `Option<PartialT>` and completed with
    /// `T::from_partial`.
    Nested,
}

impl ConfigField {
    fn kind(&self) -> FieldKind {
        match &self.partial_ty {
            Some(_) => FieldKind::Nested,
            None if is_option(&self.ty) => FieldKind::Optional,
            None => FieldKind::Plain,
        }
    }

    fn partial_type(&self) -> proc_macro2::TokenStream {
        let ty = &self.ty;
        match (&self.partial_ty, self.kind()) {
            (Some(pt), _) => quote! { #pt },
            (None, FieldKind::Plain) => quote! { Option<#ty> },
            (None, _) => quote! { #ty },
        }
    }

    /// The expression that turns `partial.<name>` into the full value.
    fn resolve(&self) -> proc_macro2::TokenStream {
        let name = &self.name;
        let ty = &self.ty;
        let default_value = &self.default_value;
        match self.kind() {
            FieldKind::Plain => quote! { partial.#name.unwrap_or_else(|| #default_value) },
            FieldKind::Optional => quote! { partial.#name.or_else(|| #default_value) },
            FieldKind::Nested => quote! {
                partial.#name.map(<#ty>::from_partial).unwrap_or_else(|| #default_value)
            },
        }
    }
}

/// Generates a configuration struct.
///
/// ```ignore
/// config! {
///     pub struct MinimizerConfig {
///         check_invariants: bool = true,
///         logger: LoggerConfig (Option<PartialLoggerConfig> = LoggerConfig::default()),
///     }
/// }
/// ```
///
/// expands to `MinimizerConfig` (with `Default` built from the listed
/// defaults), a deserializable `PartialMinimizerConfig` where every field is
/// optional, TOML loaders and `with_*`, `set_*` and `get_*` accessors. The
/// invoking crate must depend on `serde`, `toml` and `anyhow`.
#[proc_macro]
pub fn config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as ConfigInput);
    let vis = &input.vis;
    let struct_name = &input.name;
    let partial_struct_name = format_ident!("Partial{}", struct_name);

    let fields = input.fields.iter().map(|f| {
        let attrs = &f.attrs;
        let name = &f.name;
        let ty = &f.ty;
        quote! { #( #attrs )* #name: #ty }
    });

    let partial_fields = input.fields.iter().map(|f| {
        let name = &f.name;
        let partial_ty = f.partial_type();
        quote! { #name: #partial_ty }
    });

    let from_partial_assignments = input.fields.iter().map(|f| {
        let name = &f.name;
        let value = f.resolve();
        quote! { #name: #value }
    });

    let default_assignments = input.fields.iter().map(|f| {
        let name = &f.name;
        let default_value = &f.default_value;
        quote! { #name: #default_value }
    });

    let accessors = input.fields.iter().map(|f| {
        let name = &f.name;
        let ty = &f.ty;
        let with_name = format_ident!("with_{}", name);
        let set_name = format_ident!("set_{}", name);
        let get_name = format_ident!("get_{}", name);
        quote! {
            pub fn #with_name(mut self, #name: #ty) -> Self {
                self.#name = #name;
                self
            }
            pub fn #set_name(&mut self, #name: #ty) {
                self.#name = #name;
            }
            pub fn #get_name(&self) -> &#ty {
                &self.#name
            }
        }
    });

    let expanded = quote! {
        #[derive(Debug, Clone, serde::Serialize)]
        #vis struct #struct_name {
            #( #fields, )*
        }

        #[derive(Debug, Clone, Default, serde::Deserialize)]
        #vis struct #partial_struct_name {
            #( #partial_fields, )*
        }

        impl #struct_name {
            pub fn from_partial(partial: #partial_struct_name) -> Self {
                Self {
                    #( #from_partial_assignments, )*
                }
            }

            pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
                let partial: #partial_struct_name = toml::from_str(content)?;
                Ok(Self::from_partial(partial))
            }

            pub fn from_file<P: AsRef<std::path::Path>>(file_path: P) -> anyhow::Result<Self> {
                let canonic_path = std::fs::canonicalize(file_path)?;
                let content = std::fs::read_to_string(canonic_path)?;
                Self::from_toml_str(&content)
            }

            pub fn from_optional_file<P: AsRef<std::path::Path>>(file_path: Option<P>) -> anyhow::Result<Self> {
                match file_path {
                    Some(p) => Self::from_file(p),
                    None => Ok(Self::default()),
                }
            }

            #( #accessors )*
        }

        impl Default for #struct_name {
            fn default() -> Self {
                #struct_name {
                    #( #default_assignments, )*
                }
            }
        }
    };

    TokenStream::from(expanded)
}
