//! Derive macros for tasklist action enums
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates stable kind names for action enums
//!
//! # Example
//!
//! ```ignore
//! use tasklist_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TaskAction {
//!     Add { title: String },
//!     #[action(kind = "REMOVE")]
//!     Delete { id: u64 },
//! }
//!
//! assert_eq!(TaskAction::Add { title: "x".into() }.kind(), "ADD");
//! assert_eq!(TaskAction::Delete { id: 1 }.kind(), "REMOVE");
//! assert_eq!(TaskAction::KINDS, &["ADD", "REMOVE"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr, Variant};

/// Derive macro for Action enums
///
/// Generates, on the enum itself:
/// - `kind()` - the variant's kind name as a `&'static str`
/// - `KINDS` - every kind name, in declaration order
///
/// The kind name defaults to the variant name in `UPPER_SNAKE_CASE`
/// (`SetDraft` becomes `SET_DRAFT`). Override it per variant with
/// `#[action(kind = "...")]`.
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type or an enum with no variants
/// - Two variants end up with the same kind name
/// - An `#[action(...)]` attribute is malformed
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(&input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    if data_enum.variants.is_empty() {
        return syn::Error::new_spanned(&input, "#[derive(Action)] needs at least one variant")
            .to_compile_error()
            .into();
    }

    let mut kinds: Vec<String> = Vec::with_capacity(data_enum.variants.len());
    let mut kind_arms: Vec<TokenStream2> = Vec::with_capacity(data_enum.variants.len());

    for variant in &data_enum.variants {
        let variant_name = &variant.ident;

        let kind = match kind_override(&variant.attrs) {
            Ok(Some(kind)) => kind,
            Ok(None) => upper_snake(&variant_name.to_string()),
            Err(error) => return error.to_compile_error().into(),
        };

        if kinds.contains(&kind) {
            return syn::Error::new_spanned(
                variant,
                format!("duplicate action kind `{kind}`"),
            )
            .to_compile_error()
            .into();
        }

        kind_arms.push(kind_arm(variant, &kind));
        kinds.push(kind);
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Every kind name this action enum can produce, in declaration order
            pub const KINDS: &'static [&'static str] = &[#(#kinds),*];

            /// Returns the stable kind name of this action
            #[must_use]
            pub const fn kind(&self) -> &'static str {
                match self {
                    #(#kind_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// One `match` arm mapping `variant` to its kind name
fn kind_arm(variant: &Variant, kind: &str) -> TokenStream2 {
    let variant_name = &variant.ident;
    match &variant.fields {
        Fields::Named(_) => quote! { Self::#variant_name { .. } => #kind, },
        Fields::Unnamed(_) => quote! { Self::#variant_name(..) => #kind, },
        Fields::Unit => quote! { Self::#variant_name => #kind, },
    }
}

/// Reads `#[action(kind = "...")]` from a variant's attributes
fn kind_override(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut kind = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("action")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("kind") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(meta.error("action kind cannot be empty"));
                }
                kind = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported action attribute, expected `kind`"))
            }
        })?;
    }

    Ok(kind)
}

/// `SetDraft` -> `SET_DRAFT`
fn upper_snake(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    let mut prev_lower = false;

    for ch in ident.chars() {
        if ch.is_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        out.extend(ch.to_uppercase());
    }

    out
}
