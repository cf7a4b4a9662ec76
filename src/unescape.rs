/*!
String unescaping for JSON strings.

This module resolves `\"`, `\\`, `\/`, `\b`, `\f`, `\n`, `\r`, `\t` and `\uXXXX`
escapes (including surrogate pairs) into their decoded UTF8 form.

It's not a general-purpose implementation, it requires strings come from a previously
scanned JSON string value (quotes excluded), which guarantees the byte range can't
end on an unescaped `\`.
*/

use std::{borrow::BorrowMut, ptr, str};

// SAFETY: The string must not end with a `\` unless it's been escaped.
// This is guaranteed for strings produced by `crate::scan`, because a lone
// trailing `\` would have consumed the closing quote as an escape instead
// of terminating the string.
pub(crate) unsafe fn unescape_trusted(input: &str) -> String {
    let input = input.as_bytes();

    let mut scan = Scan {
        input_offset: 0,
        escape: false,
        start: 0,
        first_surrogate: None,
    };

    let mut unescaped = Unescaped {
        buf: Vec::with_capacity(input.len()),
    };

    unescape_block(ScanBlockInput {
        input,
        scan: &mut scan,
        unescaped: &mut unescaped,
        read_to: input.len() as isize,
    });

    unescape_end(input, scan, unescaped)
}

#[inline]
fn unescape_end(input: &[u8], mut scan: Scan, mut unescaped: Unescaped) -> String {
    flush(input, input.len(), &mut scan, &mut unescaped);

    owned_from_utf8_unchecked!(unescaped.buf)
}

struct Scan {
    /**
    The current byte offset into the input.
    */
    input_offset: isize,
    /**
    The position to start copying from.
    */
    start: isize,
    /**
    Whether or not the current character is escaped.
    */
    escape: bool,
    /**
    A previously parsed `\u` escape that should be a surrogate pair.
    */
    first_surrogate: Option<u16>,
}

struct Unescaped {
    buf: Vec<u8>,
}

struct ScanFnInput<'a> {
    input: &'a [u8],
    curr_offset: usize,
    scan: &'a mut Scan,
    unescaped: &'a mut Unescaped,
}

struct ScanBlockInput<'a> {
    input: &'a [u8],
    scan: &'a mut Scan,
    unescaped: &'a mut Unescaped,
    read_to: isize,
}

#[inline(always)]
fn unescape_block(i: ScanBlockInput) {
    while i.scan.input_offset < i.read_to {
        let curr_offset = i.scan.input_offset as usize;
        let curr = *get_unchecked!(i.input, curr_offset);

        if let b'\\' = curr {
            interest_unescape(ScanFnInput {
                curr_offset,
                input: i.input,
                scan: i.scan,
                unescaped: i.unescaped,
            });
        }

        i.scan.input_offset += 1;
    }

    test_assert_eq!(i.read_to, i.scan.input_offset);
}

#[inline(always)]
fn flush(input: &[u8], flush_to: usize, scan: &mut Scan, unescaped: &mut Unescaped) {
    // if a string starts with an escape then we'll try flush 0 bytes
    if flush_to == scan.start as usize {
        return;
    }

    let cnt = flush_to - scan.start as usize;

    test_assert!(cnt > 0);
    test_assert!(unescaped.buf.len() + cnt <= unescaped.buf.capacity());

    // manually copy into the vec, knowing the slices don't overlap
    // this is more efficient than `extend_from_slice` and friends,
    // because those methods can't guarantee there's no overlapping

    // SAFETY: The `src` and `cnt` slice is within `input`,
    // and the `dst` and `cnt` slice is within `buf`'s capacity.
    // SAFETY: We're only copying bytes, that are `Copy`.
    unsafe {
        let src = input.as_ptr().offset(scan.start);
        let dst = unescaped.buf.as_mut_ptr().add(unescaped.buf.len());

        ptr::copy_nonoverlapping(src, dst, cnt);
        unescaped.buf.set_len(unescaped.buf.len() + cnt);
    }

    scan.start = flush_to as isize;
}

impl<'a> ScanFnInput<'a> {
    #[inline(always)]
    fn flush(&mut self) {
        flush(self.input, self.curr_offset, self.scan, self.unescaped);

        // skip over the `\`
        self.scan.start += 1;
    }

    #[inline(always)]
    fn push_unescaped_byte(&mut self, b: u8) {
        self.unescaped.buf.push(b);

        // skip over the escape char
        self.scan.start += 1;
    }

    #[inline]
    fn push_unescaped_char(&mut self, c: char) {
        let mut buf = [0; 4];

        let encoded = c.encode_utf8(&mut buf);
        self.unescaped.buf.extend(encoded.as_bytes());

        // skip over the escape chars
        self.scan.start += 4;
    }

    #[inline]
    fn begin_surrogate_pair(&mut self, first: u16) {
        self.scan.first_surrogate = Some(first);

        // skip over the escape chars
        self.scan.start += 4;
    }
}

#[inline(always)]
fn interest_unescape<'a, I: BorrowMut<ScanFnInput<'a>>>(mut i: I) {
    let i = i.borrow_mut();

    let escaped = i.scan.escape;
    i.scan.escape = !escaped;

    if escaped {
        // if the last character was a `\` then we've already cleared
        // the escape bit, all that needs to be done is for a `\` to be pushed
        i.push_unescaped_byte(b'\\');
    } else {
        i.flush();

        // peek the escape char
        i.curr_offset += 1;
        let escaped = *get_unchecked!(i.input, i.curr_offset);

        match escaped {
            b'n' => i.push_unescaped_byte(b'\n'),
            b'"' => i.push_unescaped_byte(b'"'),
            b'/' => i.push_unescaped_byte(b'/'),
            b'\\' => return, // `\` will be unescaped later
            b'r' => i.push_unescaped_byte(b'\r'),
            b't' => i.push_unescaped_byte(b'\t'),
            b'f' => i.push_unescaped_byte(0x0c),
            b'b' => i.push_unescaped_byte(0x08),
            b'u' => {
                // skip over the escape char
                i.scan.start += 1;
                i.curr_offset += 1;

                // we have at least 4 bytes left for an escape code
                if i.input
                    .len()
                    .checked_sub(4usize)
                    .map(|start| i.curr_offset <= start)
                    .unwrap_or(false)
                {
                    let mut unescape = || {
                        let digits = str::from_utf8(get_unchecked!(
                            i.input,
                            i.curr_offset..i.curr_offset + 4
                        ))
                        .map_err(|_| ())?;
                        let code = u16::from_str_radix(digits, 16).map_err(|_| ())?;

                        // if we get this far then we're looking at a hex number
                        // we guarantee there are no `\` in the 4 bytes we've just looked through
                        // NOTE: only attempting to match the surrogate here means we'll accept `\u`
                        // escapes with other characters between them, but still guarantee valid UTF8
                        match i.scan.first_surrogate.take() {
                            // if we had a surrogate pair, then attempt to map it to a multibyte
                            Some(first) => {
                                let ch = crate::std_ext::char::try_from_utf16_surrogate_pair(
                                    first, code,
                                )
                                .map_err(|_| ())?;
                                i.push_unescaped_char(ch);
                            }
                            // if we didn't have a surrogate pair,
                            // then attempt to interpret the code as a 2-4 byte character
                            None => match char::try_from(code as u32) {
                                Ok(ch) => i.push_unescaped_char(ch),
                                Err(_) => i.begin_surrogate_pair(code),
                            },
                        }

                        Ok::<(), ()>(())
                    };

                    let _ = unescape();
                }
            }
            // fallback case
            // we don't expect invalid escapes to reach here,
            // so if something does then we just ignore the `\`
            // the bytes following the unescaped `\` are valid UTF8
            // so we'll append them to the string later
            _ => (),
        }

        i.scan.escape = false;
    }
}

#[cfg(test)]
mod tests {
    use super::unescape_trusted;

    #[test]
    fn no_escapes() {
        let input = "plain string";
        assert_eq!(input, unsafe { unescape_trusted(input) });
    }

    #[test]
    fn simple_escapes() {
        let input = "line\\nbreak\\ttab\\\"quote\\\\backslash";
        let expected = "line\nbreak\ttab\"quote\\backslash";
        assert_eq!(expected, unsafe { unescape_trusted(input) });
    }

    #[test]
    fn solidus_escape() {
        assert_eq!("a/b", unsafe { unescape_trusted("a\\/b") });
    }

    #[test]
    fn unicode_escape() {
        assert_eq!("壁", unsafe { unescape_trusted("\\u58c1") });
    }

    #[test]
    fn surrogate_pair() {
        assert_eq!("😄", unsafe { unescape_trusted("\\ud83d\\ude04") });
    }

    #[test]
    fn empty() {
        assert_eq!("", unsafe { unescape_trusted("") });
    }
}
