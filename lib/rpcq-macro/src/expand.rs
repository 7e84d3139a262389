//! `Procedure` derive expansion.

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use syn::{DeriveInput, parse2};

use crate::attrs::ProcedureAttrs;

/// Expand `#[derive(Procedure)]`.
pub fn expand_procedure_derive(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let attrs = ProcedureAttrs::from_attrs(&input.attrs, input.ident.span())?;

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let key = attrs.key.canonical();
    let path = &attrs.key.path;
    let method = Ident::new(attrs.key.method.as_str(), Span::call_site());
    let path_params = &attrs.key.placeholders;

    let input_ty = attrs
        .input
        .map_or_else(|| quote! { () }, |ty| quote! { #ty });
    let output_ty = attrs
        .output
        .map_or_else(|| quote! { ::rpcq::serde_json::Value }, |ty| quote! { #ty });

    let kind_trait = if attrs.key.method.is_query() {
        quote! { ::rpcq::QueryProcedure }
    } else {
        quote! { ::rpcq::MutationProcedure }
    };

    Ok(quote! {
        impl #impl_generics ::rpcq::Procedure for #name #ty_generics #where_clause {
            const KEY: &'static str = #key;
            const METHOD: ::rpcq::Method = ::rpcq::Method::#method;
            const PATH: &'static str = #path;
            const PATH_PARAMS: &'static [&'static str] = &[#(#path_params),*];
            type Input = #input_ty;
            type Output = #output_ty;
        }

        impl #impl_generics #kind_trait for #name #ty_generics #where_clause {}
    })
}
