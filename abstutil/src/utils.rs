use std::collections::BTreeSet;

/// "a", "a and b", "a, b, and c"
pub fn plain_list_names(names: BTreeSet<String>) -> String {
    let len = names.len();
    let mut s = String::new();
    for (idx, n) in names.into_iter().enumerate() {
        if idx != 0 {
            if idx == len - 1 {
                if len == 2 {
                    s.push_str(" and ");
                } else {
                    s.push_str(", and ");
                }
            } else {
                s.push_str(", ");
            }
        }
        s.push_str(&n);
    }
    s
}

pub fn prettyprint_usize(x: usize) -> String {
    let num = format!("{}", x);
    let mut result = String::new();
    let mut i = num.len();
    for c in num.chars() {
        result.push(c);
        i -= 1;
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
    }
    result
}
