use crate::rule_check::{EXPECTED_KEYS, RuleName, check_metadata};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    Data, DeriveInput, Error, Fields, Ident, LitStr, Type, ext::IdentExt, parse_macro_input,
};

/// A field that declares at least one rule.
struct RuledField {
    ident: Ident,
    ty: Type,
    rules: Vec<(RuleName, LitStr)>,
}

pub fn derive_verify_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(error) => TokenStream::from(error.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "#[derive(Verify)] does not support generic or borrowed records",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new_spanned(
                    name,
                    "#[derive(Verify)] requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(Error::new_spanned(
                name,
                "#[derive(Verify)] can only be used on structs",
            ));
        }
    };

    let mut ruled = Vec::new();
    for field in fields {
        let rules = parse_rules(field)?;
        if rules.is_empty() {
            continue;
        }
        if let Some(ident) = &field.ident {
            ruled.push(RuledField {
                ident: ident.clone(),
                ty: field.ty.clone(),
                rules,
            });
        }
    }

    let count = ruled.len();
    let accessors = ruled.iter().map(|field| {
        let ident = &field.ident;
        let accessor = accessor_name(ident);
        quote! {
            fn #accessor(record: &#name) -> ::fieldrule::FieldValue<'_> {
                ::fieldrule::IntoFieldValue::field_value(&record.#ident)
            }
        }
    });

    let caches = ruled.iter().enumerate().filter_map(|(index, field)| {
        field
            .rules
            .iter()
            .any(|(rule, _)| *rule == RuleName::Pattern)
            .then(|| {
                let cache = pattern_cache_name(index);
                quote! {
                    static #cache: ::fieldrule::PatternCache = ::fieldrule::PatternCache::new();
                }
            })
    });

    let descriptors = ruled.iter().enumerate().map(|(index, field)| {
        let field_name = field.ident.unraw().to_string();
        let ty = &field.ty;
        let accessor = accessor_name(&field.ident);
        let rules = field.rules.iter().map(|(rule, raw)| {
            if *rule == RuleName::Pattern {
                let cache = pattern_cache_name(index);
                return quote! { ::fieldrule::Rule::pattern(#raw, &#cache) };
            }
            let variant = format_ident!("{}", rule.variant());
            quote! { ::fieldrule::Rule::new(::fieldrule::RuleKind::#variant, #raw) }
        });
        quote! {
            ::fieldrule::FieldDescriptor {
                name: #field_name,
                kind: <#ty as ::fieldrule::IntoFieldValue>::KIND,
                rules: &[#(#rules),*],
                value: #accessor,
            }
        }
    });

    let assertions = ruled.iter().flat_map(|field| {
        let ty = &field.ty;
        let field_name = field.ident.unraw().to_string();
        field.rules.iter().map(move |(rule, _)| {
            let variant = format_ident!("{}", rule.variant());
            let message = format!(
                "field `{}` of type `{}` cannot carry a `{}` rule",
                field_name,
                quote!(#ty).to_string().replace(' ', ""),
                rule.tag()
            );
            quote! {
                ::core::assert!(
                    <#ty as ::fieldrule::IntoFieldValue>::KIND
                        .supports(::fieldrule::RuleKind::#variant),
                    #message
                );
            }
        })
    });

    Ok(quote! {
        impl ::fieldrule::Verify for #name {
            fn fields() -> &'static [::fieldrule::FieldDescriptor<Self>] {
                #(#accessors)*
                #(#caches)*

                static FIELDS: [::fieldrule::FieldDescriptor<#name>; #count] = [
                    #(#descriptors),*
                ];
                &FIELDS
            }
        }

        const _: () = {
            #(#assertions)*
        };
    })
}

fn accessor_name(ident: &Ident) -> Ident {
    format_ident!("__fieldrule_value_{}", ident.unraw())
}

fn pattern_cache_name(index: usize) -> Ident {
    format_ident!("__FIELDRULE_PATTERN_{}", index)
}

fn parse_rules(field: &syn::Field) -> syn::Result<Vec<(RuleName, LitStr)>> {
    let mut rules: Vec<(RuleName, LitStr)> = Vec::new();

    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("rule")) {
        attr.parse_nested_meta(|meta| {
            let key = meta
                .path
                .get_ident()
                .map(|ident| ident.to_string())
                .ok_or_else(|| meta.error(format!("expected one of: {}", EXPECTED_KEYS)))?;
            let rule = RuleName::from_key(&key).ok_or_else(|| {
                meta.error(format!(
                    "unknown rule `{}`, expected one of: {}",
                    key, EXPECTED_KEYS
                ))
            })?;
            if rules.iter().any(|(existing, _)| *existing == rule) {
                return Err(meta.error(format!("duplicate `{}` rule", rule.tag())));
            }

            let raw: LitStr = meta.value()?.parse()?;
            check_metadata(rule, &raw.value(), raw.span())?;
            rules.push((rule, raw));
            Ok(())
        })?;
    }

    Ok(rules)
}
