//! Test attribute shared by the `async-subject` test suites.
//!
//! `#[async_subject_macro::test]` on a sync fn expands to `#[test]`; on an
//! async fn it expands to `#[tokio::test]`. The optional flavor argument picks
//! the runtime a subject scope is meant to run on:
//!
//! - `local`: current-thread runtime, for `Local` subjects.
//! - `shared`: multi-thread runtime, for `Shared` subjects.
//!
//! On wasm32 every test is routed through `wasm_bindgen_test` instead.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, Ident, ItemFn, LitStr};

const USAGE: &str = "async_subject_macro::test only accepts: #[async_subject_macro::test], \
                     #[async_subject_macro::test(local)], #[async_subject_macro::test(shared)], \
                     or string equivalents";

fn flavor(name: &str) -> Option<proc_macro2::TokenStream> {
  match name {
    "local" => Some(quote!(flavor = "current_thread")),
    "shared" => Some(quote!(flavor = "multi_thread", worker_threads = 2)),
    _ => None,
  }
}

#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);
  let is_async = input.sig.asyncness.is_some();
  let raw_args = proc_macro2::TokenStream::from(attr);

  let tokio_args = if raw_args.is_empty() {
    proc_macro2::TokenStream::new()
  } else {
    if !is_async {
      return syn::Error::new(
        raw_args.span(),
        "flavor args are only supported for async tests; drop the argument or make the fn async",
      )
      .to_compile_error()
      .into();
    }

    let parsed = if let Ok(ident) = syn::parse2::<Ident>(raw_args.clone()) {
      flavor(&ident.to_string()).ok_or_else(|| syn::Error::new(ident.span(), USAGE))
    } else if let Ok(lit) = syn::parse2::<LitStr>(raw_args.clone()) {
      flavor(&lit.value()).ok_or_else(|| syn::Error::new(lit.span(), USAGE))
    } else {
      Err(syn::Error::new(raw_args.span(), USAGE))
    };

    match parsed {
      Ok(args) => args,
      Err(err) => return err.to_compile_error().into(),
    }
  };

  let wasm_attr = if is_async {
    quote!(wasm_bindgen_test::wasm_bindgen_test(async))
  } else {
    quote!(wasm_bindgen_test::wasm_bindgen_test)
  };

  let native_attr = if is_async { quote!(tokio::test(#tokio_args)) } else { quote!(test) };

  let expanded = quote! {
    #[cfg_attr(target_arch = "wasm32", #wasm_attr)]
    #[cfg_attr(not(target_arch = "wasm32"), #native_attr)]
    #input
  };

  TokenStream::from(expanded)
}
