use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, Ident, ItemFn, ReturnType, Type};

/// Expands `#[catmash_runtime::main]`.
#[must_use]
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    wrap_main(args, input).unwrap_or_else(|err| err.to_compile_error())
}

fn wrap_main(args: TokenStream, input: ItemFn) -> syn::Result<TokenStream> {
    let ItemFn { attrs, vis, sig, block } = input;

    if sig.asyncness.is_none() {
        return Err(Error::new_spanned(&sig.fn_token, "#[catmash_runtime::main] expects an async fn"));
    }
    if !sig.inputs.is_empty() {
        return Err(Error::new_spanned(&sig.inputs, "#[catmash_runtime::main] takes no arguments"));
    }
    if !is_result(&sig.output) {
        return Err(Error::new_spanned(&sig.output, "#[catmash_runtime::main] must return a Result"));
    }

    let preset = preset(args)?;
    let name = &sig.ident;
    let output = &sig.output;

    Ok(quote! {
        #(#attrs)*
        #vis fn #name() #output {
            let runtime = ::catmash_runtime::build_runtime_with_config(
                &::catmash_runtime::RuntimeConfig::#preset(),
            )?;
            runtime.block_on(async #block)
        }
    })
}

/// Maps the attribute argument to a `RuntimeConfig` constructor.
fn preset(args: TokenStream) -> syn::Result<Ident> {
    if args.is_empty() {
        return Ok(Ident::new("default", proc_macro2::Span::call_site()));
    }

    let profile: Ident = syn::parse2(args)?;
    if ["default", "high_performance", "memory_efficient"].iter().any(|p| profile == *p) {
        Ok(profile)
    } else {
        Err(Error::new_spanned(
            &profile,
            format!("unknown runtime profile `{profile}` (default, high_performance, memory_efficient)"),
        ))
    }
}

fn is_result(output: &ReturnType) -> bool {
    match output {
        ReturnType::Type(_, ty) => match ty.as_ref() {
            Type::Path(path) => path.path.segments.last().is_some_and(|seg| seg.ident == "Result"),
            _ => false,
        },
        ReturnType::Default => false,
    }
}
