//! Cross-reference recovery.
//!
//! When `startxref` or the table it points to is unusable the body is
//! usually intact. Scanning for `N G obj` headers gives back the offset of
//! every top-level object; a fresh classic xref table and trailer appended
//! to the original bytes make the file loadable again. Objects packed in
//! object streams come back through their stream.

use once_cell::sync::Lazy;
use regex::bytes::Regex;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use tracing::debug;

/// Highest object number a PDF may use.
const MAX_OBJECT_NUMBER: u32 = 8_388_607;

static RE_OBJ_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\A|[\r\n])[ \t]*(\d{1,7})[ \t\r\n]+(\d{1,5})[ \t\r\n]+obj\b").unwrap());

static RE_CATALOG: Lazy<Regex> = Lazy::new(|| Regex::new(r"/Type\s*/Catalog\b").unwrap());

/// Append a rebuilt xref table and trailer to `bytes`.
///
/// Returns `None` when no catalog object can be found in the body.
pub(crate) fn reconstruct(bytes: &[u8]) -> Option<Vec<u8>> {
    let objects = scan_objects(bytes);
    let (root_num, root_gen) = find_catalog(bytes, &objects)?;
    let size = objects.keys().next_back().map_or(1, |&n| n + 1);

    let mut out = bytes.to_vec();
    if !out.ends_with(b"\n") {
        out.push(b'\n');
    }
    let xref_offset = out.len();

    let mut table = format!("xref\n0 {size}\n0000000000 65535 f \n");
    for n in 1..size {
        match objects.get(&n) {
            Some(&(gen, offset)) => {
                let _ = write!(table, "{offset:010} {gen:05} n \n");
            }
            None => table.push_str("0000000000 65535 f \n"),
        }
    }
    let _ = write!(
        table,
        "trailer\n<< /Size {size} /Root {root_num} {root_gen} R >>\nstartxref\n{xref_offset}\n%%EOF\n"
    );
    out.extend_from_slice(table.as_bytes());

    debug!(objects = objects.len(), root = root_num, "Rebuilt cross-reference table");
    Some(out)
}

/// Object number → (generation, offset of its header). A later header for
/// the same number wins, as it would after an incremental update.
fn scan_objects(bytes: &[u8]) -> BTreeMap<u32, (u16, usize)> {
    let mut found = BTreeMap::new();
    for caps in RE_OBJ_HEADER.captures_iter(bytes) {
        let (Some(num), Some(gen)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let (Some(n), Some(g)) = (parse_digits::<u32>(num.as_bytes()), parse_digits::<u16>(gen.as_bytes())) else {
            continue;
        };
        if n == 0 || n > MAX_OBJECT_NUMBER {
            continue;
        }
        found.insert(n, (g, num.start()));
    }
    found
}

/// The last object in file order whose body declares `/Type /Catalog`.
fn find_catalog(bytes: &[u8], objects: &BTreeMap<u32, (u16, usize)>) -> Option<(u32, u16)> {
    objects
        .iter()
        .filter(|(_, (_, offset))| {
            let body = &bytes[*offset..];
            let end = body.windows(6).position(|w| w == b"endobj").unwrap_or(body.len());
            RE_CATALOG.is_match(&body[..end])
        })
        .max_by_key(|(_, (_, offset))| *offset)
        .map(|(&n, &(g, _))| (n, g))
}

fn parse_digits<T: std::str::FromStr>(digits: &[u8]) -> Option<T> {
    std::str::from_utf8(digits).ok()?.parse().ok()
}
