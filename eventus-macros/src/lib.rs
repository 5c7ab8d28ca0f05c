//! Procedural macros for the Eventus runtime.
//!
//! - `#[eventus::main]` runs an `async fn main` on a fresh runtime.
//! - `#[eventus::test]` runs an `async` test on a fresh runtime.
//!
//! Both accept `worker_threads = N` and `thread_name = "..."`.

mod utils;

use proc_macro::{TokenStream, TokenTree};
use utils::{RuntimeArgs, compile_error, wrap_in_runtime};

#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match RuntimeArgs::parse(attr) {
        Ok(args) => args,
        Err(msg) => return compile_error(&msg),
    };

    match wrap_in_runtime(item, &args.builder(), "") {
        Ok(tokens) => tokens.into_iter().collect(),
        Err(msg) => compile_error(&msg),
    }
}

#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match RuntimeArgs::parse(attr) {
        Ok(args) => args,
        Err(msg) => return compile_error(&msg),
    };

    let tokens = match wrap_in_runtime(item, &args.builder(), ";") {
        Ok(tokens) => tokens,
        Err(msg) => return compile_error(&msg),
    };

    let test_attr: TokenStream = "#[test]".parse().unwrap_or_default();
    let mut result: Vec<TokenTree> = test_attr.into_iter().collect();
    result.extend(tokens);

    result.into_iter().collect()
}
