//! Glyphs and line-formatting helpers for tree rendering

/// Connector drawn before an entry that has siblings after it.
pub const BRANCH: &str = "├── ";
/// Connector drawn before the last entry of a level.
pub const LAST_BRANCH: &str = "└── ";
/// Prefix extension under a non-last entry, continuing the trunk.
pub const TRUNK_EXTENSION: &str = "│   ";
/// Prefix extension under the last entry of a level.
pub const BLANK_EXTENSION: &str = "    ";

const SIZE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

// st_mode file type bits
const S_IFMT: u32 = 0o170000;
const S_IFSOCK: u32 = 0o140000;
const S_IFLNK: u32 = 0o120000;
const S_IFREG: u32 = 0o100000;
const S_IFBLK: u32 = 0o060000;
const S_IFDIR: u32 = 0o040000;
const S_IFCHR: u32 = 0o020000;
const S_IFIFO: u32 = 0o010000;

const S_ISUID: u32 = 0o4000;
const S_ISGID: u32 = 0o2000;
const S_ISVTX: u32 = 0o1000;

pub fn connector(is_last: bool) -> &'static str {
    if is_last { LAST_BRANCH } else { BRANCH }
}

/// Calculate the prefix for the contents of an entry.
pub fn child_prefix(current_prefix: &str, is_last: bool) -> String {
    if is_last {
        format!("{}{}", current_prefix, BLANK_EXTENSION)
    } else {
        format!("{}{}", current_prefix, TRUNK_EXTENSION)
    }
}

/// Format a size in bytes with two decimals, stepping through
/// B, KB, MB, GB, TB and PB in powers of 1024.
pub fn human_readable_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", size, SIZE_UNITS[unit])
}

/// Render raw `st_mode` bits as a symbolic string such as `drwxr-xr-x`.
pub fn format_mode(mode: u32) -> String {
    let kind = match mode & S_IFMT {
        S_IFDIR => 'd',
        S_IFREG => '-',
        S_IFLNK => 'l',
        S_IFCHR => 'c',
        S_IFBLK => 'b',
        S_IFIFO => 'p',
        S_IFSOCK => 's',
        _ => '?',
    };

    let mut out = String::with_capacity(10);
    out.push(kind);
    push_triplet(&mut out, mode >> 6, mode & S_ISUID != 0, 's');
    push_triplet(&mut out, mode >> 3, mode & S_ISGID != 0, 's');
    push_triplet(&mut out, mode, mode & S_ISVTX != 0, 't');
    out
}

/// Append one `rwx` group. `special` replaces the execute slot with
/// `marker` (lowercase when executable, uppercase otherwise).
fn push_triplet(out: &mut String, bits: u32, special: bool, marker: char) {
    out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
    out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
    let exec = bits & 0o1 != 0;
    out.push(match (special, exec) {
        (true, true) => marker,
        (true, false) => marker.to_ascii_uppercase(),
        (false, true) => 'x',
        (false, false) => '-',
    });
}
