use super::ParseError;

const PID_MARKER: &str = "$$";
const BACKGROUND_MARKER: &str = "&";

/// One line after expansion, ready for dispatch.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedLine {
    pub args: Vec<String>,
    pub background: bool,
}

impl ParsedLine {
    pub fn is_blank(&self) -> bool {
        self.args.is_empty()
    }
}

/// Turn a raw line into an argument vector.
///
/// A trailing `&` token is always stripped; it only requests background
/// execution while `foreground_only` is off. Every `$$` in every token becomes
/// `pid`, except `\$$`, which is kept as a literal `$$`.
pub fn expand(
    line: &str,
    pid: u32,
    foreground_only: bool,
    limit: usize,
) -> Result<ParsedLine, ParseError> {
    if line.len() >= limit {
        return Err(ParseError::TooLong {
            len: line.len(),
            limit,
        });
    }

    let mut tokens: Vec<&str> = line.split_whitespace().collect();
    let marked = tokens.last() == Some(&BACKGROUND_MARKER);
    if marked {
        tokens.pop();
    }

    let pid = pid.to_string();
    let args = tokens
        .into_iter()
        .map(|token| expand_pid(token, &pid))
        .collect();

    Ok(ParsedLine {
        args,
        background: marked && !foreground_only,
    })
}

fn expand_pid(token: &str, pid: &str) -> String {
    if !token.contains(PID_MARKER) {
        return token.to_owned();
    }

    let mut out = String::with_capacity(token.len() + pid.len());
    let mut rest = token;
    while let Some(pos) = rest.find(PID_MARKER) {
        let (head, tail) = rest.split_at(pos);
        match head.strip_suffix('\\') {
            Some(literal) => {
                out.push_str(literal);
                out.push_str(PID_MARKER);
            }
            None => {
                out.push_str(head);
                out.push_str(pid);
            }
        }
        rest = &tail[PID_MARKER.len()..];
    }
    out.push_str(rest);
    out
}
