use crate::grammar::{DARK_MARKER, MalformedToken, RawFields};

struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_literal(&mut self, lit: &str) -> bool {
        if self.input[self.pos..].starts_with(lit) {
            self.pos += lit.len();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !pred(b) {
                break;
            }
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn digits(&mut self, expected: &'static str) -> Result<&'a str, MalformedToken> {
        let s = self.take_while(|b| b.is_ascii_digit());
        if s.is_empty() {
            return Err(self.fail(expected));
        }
        Ok(s)
    }

    fn at_end(&self) -> bool {
        self.pos == self.input.len()
    }

    fn fail(&self, expected: &'static str) -> MalformedToken {
        MalformedToken {
            token: self.input.to_string(),
            offset: self.pos,
            expected,
        }
    }
}

/// Split a path token into raw fields. The match is anchored at both ends.
pub fn tokenize(token: &str) -> Result<RawFields, MalformedToken> {
    let mut s = Scanner::new(token);

    let width = s.digits("width digits")?.to_string();

    let height = if s.eat(b'x') {
        Some(s.digits("height digits after 'x'")?.to_string())
    } else {
        None
    };

    let dpr = if s.eat(b'@') {
        let start = s.pos;
        s.digits("dpr digits after '@'")?;
        if s.eat(b'.') {
            if !s.peek().is_some_and(|b| b.is_ascii_digit()) {
                return Err(s.fail("one fractional dpr digit after '.'"));
            }
            s.pos += 1;
        }
        let text = &token[start..s.pos];
        if !s.eat(b'x') {
            return Err(s.fail("'x' after dpr"));
        }
        Some(text.to_string())
    } else {
        None
    };

    let format = if s.eat(b'.') {
        let name = s.take_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        if name.is_empty() {
            return Err(s.fail("format name after '.'"));
        }
        Some(name.to_string())
    } else {
        None
    };

    let dark = if s.eat(b'/') {
        if !s.eat_literal(DARK_MARKER) {
            return Err(s.fail("'dark' after '/'"));
        }
        true
    } else {
        false
    };

    if !s.at_end() {
        return Err(s.fail("end of token"));
    }

    Ok(RawFields {
        width,
        height,
        dpr,
        format,
        dark,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/grammar/scanner.rs"]
mod tests;
