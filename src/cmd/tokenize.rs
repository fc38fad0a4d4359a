/*!
tokenize.rs - split an argument string into tokens.

Rules:
  - whitespace separates tokens
  - a double-quoted run keeps its whitespace; the quotes are dropped
  - quoted and unquoted text touching each other form one token
    (`--str="a b"` -> `--str=a b`)
  - no escapes; an unterminated quote runs to the end of input
*/

/// Split `text` into tokens. Never fails; empty input gives no tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // Distinguishes `""` (an empty token) from no token at all.
    let mut in_token = false;
    let mut quoted = false;

    for ch in text.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}
