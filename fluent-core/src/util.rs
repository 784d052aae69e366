use std::fmt::Write;

/// Calls `f` for every value, writing `separator` between two non empty outputs.
pub fn separated_by<O, T, F>(
    out: &mut O,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    O: Write + AsRef<str> + ?Sized,
    F: FnMut(&mut O, T),
{
    let mut len = out.as_ref().len();
    for v in values {
        if out.as_ref().len() > len {
            let _ = out.write_str(separator);
        }
        len = out.as_ref().len();
        f(out, v);
    }
}

#[macro_export]
macro_rules! possibly_parenthesized {
    ($buff:ident, $cond:expr, $v:expr) => {
        if $cond {
            $buff.push('(');
            $v;
            $buff.push(')');
        } else {
            $v;
        }
    };
}

/// Longest prefix of `value` not exceeding `len` bytes that ends on a char boundary.
pub fn truncate_str(value: &str, len: usize) -> &str {
    let mut end = value.len().min(len);
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            $crate::truncate_str(&$query, 497).trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}

/// Runs the code with logging disabled, restoring the previous level afterwards.
#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = ::log::max_level();
        ::log::set_max_level(::log::LevelFilter::Off);
        let result = { $($code)+ };
        ::log::set_max_level(level);
        result
    }};
}
