//! Universal-newline splitting over raw bytes.

/// Split `input` into line records.
///
/// A record ends at `\n`, `\r\n`, or a lone `\r`; the terminator bytes are
/// not part of the record. Input ending without a terminator contributes a
/// final record; input ending with one does not contribute an empty record.
/// These are the same boundaries Python's `bytes.splitlines` recognizes for
/// ASCII terminators, which is what most device tooling expects.
///
/// Records borrow from `input` and preserve every byte verbatim.
pub fn split_lines(input: &[u8]) -> Vec<&[u8]> {
    let mut records = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < input.len() {
        match input[i] {
            b'\n' => {
                records.push(&input[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                records.push(&input[start..i]);
                i += 1;
                // \r\n is one boundary, not two.
                if i < input.len() && input[i] == b'\n' {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }

    if start < input.len() {
        records.push(&input[start..]);
    }

    records
}
