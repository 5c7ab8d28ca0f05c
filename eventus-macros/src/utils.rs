use proc_macro::{Delimiter, Group, TokenStream, TokenTree};

/// Options accepted by `#[eventus::main]` and `#[eventus::test]`.
#[derive(Default)]
pub(crate) struct RuntimeArgs {
    pub(crate) worker_threads: Option<usize>,
    pub(crate) thread_name: Option<String>,
}

impl RuntimeArgs {
    /// Parses `worker_threads = N, thread_name = "..."`.
    ///
    /// Unknown keys are reported as an error message.
    pub(crate) fn parse(attr: TokenStream) -> Result<Self, String> {
        let mut args = Self::default();
        let attr = attr.to_string();

        for part in attr.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((key, value)) = part.split_once('=') else {
                return Err(format!("expected `key = value`, found `{part}`"));
            };

            let value = value.trim();

            match key.trim() {
                "worker_threads" => {
                    let n = value
                        .parse::<usize>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| format!("invalid worker_threads `{value}`"))?;
                    args.worker_threads = Some(n);
                }
                "thread_name" => {
                    let name = value
                        .strip_prefix('"')
                        .and_then(|v| v.strip_suffix('"'))
                        .ok_or_else(|| format!("thread_name must be a string literal, found `{value}`"))?;
                    args.thread_name = Some(name.to_owned());
                }
                other => return Err(format!("unknown runtime option `{other}`")),
            }
        }

        Ok(args)
    }

    /// Source of the expression building the runtime.
    pub(crate) fn builder(&self) -> String {
        let mut builder = String::from("::eventus::RuntimeBuilder::new()");

        if let Some(n) = self.worker_threads {
            builder.push_str(&format!(".worker_threads({n})"));
        }

        if let Some(name) = &self.thread_name {
            builder.push_str(&format!(".thread_name({name:?})"));
        }

        builder.push_str(".build()");
        builder
    }
}

/// Turns `async fn f() { body }` into `fn f() { <runtime>.block_on(async move { body }) }`.
///
/// `tail` is appended after the `block_on` call (e.g. `;` to discard the
/// output).
pub(crate) fn wrap_in_runtime(
    item: TokenStream,
    builder: &str,
    tail: &str,
) -> Result<Vec<TokenTree>, String> {
    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    let Some(async_pos) = tokens
        .iter()
        .position(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "async"))
    else {
        return Err(String::from("the function must be declared `async`"));
    };
    tokens.remove(async_pos);

    let Some(pos) = tokens
        .iter()
        .rposition(|t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Brace))
    else {
        return Err(String::from("expected a function body"));
    };

    let TokenTree::Group(body) = &tokens[pos] else {
        return Err(String::from("expected a function body"));
    };

    let new_body = format!(
        "{{
            let runtime = {builder};
            runtime.block_on(async move {{ {} }}){tail}
        }}",
        body.stream()
    );

    let stream = new_body
        .parse::<TokenStream>()
        .map_err(|err| format!("failed to expand runtime body: {err}"))?;

    tokens[pos] = TokenTree::Group(Group::new(Delimiter::Brace, stream));

    Ok(tokens)
}

/// Emits `compile_error!(msg)`.
pub(crate) fn compile_error(msg: &str) -> TokenStream {
    format!("compile_error!({msg:?});")
        .parse()
        .unwrap_or_default()
}
