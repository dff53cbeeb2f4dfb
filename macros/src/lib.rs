//! `#[derive(Decode)]` for pathfig.
//!
//! Structs with named fields get a `Decode` impl that decodes every field
//! through its annotation for the active tag:
//!
//! ```ignore
//! #[derive(Decode, Default)]
//! struct Database {
//!     #[pathfig(cfg = "url,required", env = "DATABASE_URL,required")]
//!     url: String,
//!     #[pathfig(cfg = "pool.size,default=5")]
//!     pool_size: u32,
//!     #[pathfig(skip)]
//!     connected: bool,
//! }
//! ```
//!
//! `#[pathfig(custom)]` delegates to the type's `CustomDecode` impl and
//! `#[pathfig(from_str)]` to its `FromStr` impl. Both require `Default`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Fields, GenericParam, LitStr, parse_macro_input, parse_quote,
};

#[proc_macro_derive(Decode, attributes(pathfig))]
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_decode(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// How a whole type is decoded, from its container attribute.
enum Strategy {
    Fields,
    Custom,
    FromStr,
}

/// Field-level attributes.
#[derive(Default)]
struct FieldConfig {
    skip: bool,
    /// `(tag, annotation)` pairs, in declaration order.
    tags: Vec<(String, String)>,
}

fn generate_decode(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let (body, blank, generics) = match parse_strategy(&input.attrs)? {
        Strategy::Custom => (
            quote! { ::pathfig::decode::decode_custom(self, value, cx) },
            quote! { ::core::default::Default::default() },
            input.generics.clone(),
        ),
        Strategy::FromStr => (
            quote! { ::pathfig::decode::decode_from_str(self, value, cx) },
            quote! { ::core::default::Default::default() },
            input.generics.clone(),
        ),
        Strategy::Fields => {
            let (body, blank) = generate_fields(input)?;
            (body, blank, with_decode_bounds(&input.generics))
        }
    };

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::pathfig::Decode for #name #ty_generics #where_clause {
            #[allow(unused_mut, unused_variables)]
            fn decode(
                &mut self,
                value: &::pathfig::Value,
                cx: &::pathfig::Context<'_>,
            ) -> ::core::result::Result<usize, ::pathfig::PathfigError> {
                #body
            }

            fn blank() -> Self {
                #blank
            }
        }
    })
}

fn generate_fields(
    input: &DeriveInput,
) -> syn::Result<(proc_macro2::TokenStream, proc_macro2::TokenStream)> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Decode can only be derived for structs with named fields; \
                     use #[pathfig(custom)] or #[pathfig(from_str)] otherwise",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Decode can only be derived for structs; \
                 use #[pathfig(custom)] or #[pathfig(from_str)] for other types",
            ));
        }
    };

    let mut steps = Vec::new();
    let mut inits = Vec::new();

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let config = parse_field_config(&field.attrs)?;

        if config.skip {
            inits.push(quote! { #ident: ::core::default::Default::default() });
            continue;
        }
        inits.push(quote! { #ident: ::pathfig::Decode::blank() });

        let tags = config.tags.iter().map(|(tag, annotation)| {
            quote! { (#tag, #annotation) }
        });
        steps.push(quote! {
            decoded += ::pathfig::decode::decode_struct_field(
                &mut self.#ident,
                value,
                cx,
                &[#(#tags),*],
            )?;
        });
    }

    let body = quote! {
        let mut decoded = 0usize;
        #(#steps)*
        ::core::result::Result::Ok(decoded)
    };
    let blank = quote! {
        Self { #(#inits),* }
    };

    Ok((body, blank))
}

fn parse_strategy(attrs: &[Attribute]) -> syn::Result<Strategy> {
    let mut strategy = Strategy::Fields;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("pathfig")) {
        attr.parse_nested_meta(|meta| {
            let chosen = if meta.path.is_ident("custom") {
                Strategy::Custom
            } else if meta.path.is_ident("from_str") {
                Strategy::FromStr
            } else {
                return Err(meta.error("expected `custom` or `from_str`"));
            };
            if !matches!(strategy, Strategy::Fields) {
                return Err(meta.error("`custom` and `from_str` are mutually exclusive"));
            }
            strategy = chosen;
            Ok(())
        })?;
    }

    Ok(strategy)
}

fn parse_field_config(attrs: &[Attribute]) -> syn::Result<FieldConfig> {
    let mut config = FieldConfig::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("pathfig")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                config.skip = true;
                return Ok(());
            }

            let tag = meta
                .path
                .get_ident()
                .ok_or_else(|| meta.error("expected a tag name such as `cfg`"))?
                .to_string();
            if config.tags.iter().any(|(seen, _)| *seen == tag) {
                return Err(meta.error(format!("duplicate annotation for tag `{tag}`")));
            }
            let annotation: LitStr = meta.value()?.parse()?;
            config.tags.push((tag, annotation.value()));
            Ok(())
        })?;
    }

    Ok(config)
}

/// Require `Decode` of every type parameter, since fields usually mention them.
fn with_decode_bounds(generics: &syn::Generics) -> syn::Generics {
    let mut generics = generics.clone();
    for param in &mut generics.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::pathfig::Decode));
        }
    }
    generics
}
