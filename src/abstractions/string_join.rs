use std::fmt::{Display, Write};

/// Join anything displayable with a separator.
pub fn join_string<T: Display>(iter: impl Iterator<Item = T>, sep: &str) -> String {
  join_with(iter, sep, |item, out| write!(out, "{}", item))
}

/// Join with a custom writer for each item. Lets callers render items that are not `Display` themselves (e.g. a
/// vertex handle that needs the context to be described) without collecting intermediate strings.
pub fn join_with<T>(
  iter  : impl Iterator<Item = T>,
  sep   : &str,
  mut f : impl FnMut(T, &mut String) -> std::fmt::Result
) -> String {
  let mut out = String::new();
  for (i, item) in iter.enumerate() {
    if i > 0 {
      out.push_str(sep);
    }
    // Writing into a `String` cannot fail.
    let _ = f(item, &mut out);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn join_string_test() {
    let shells = ["s", "p", "d"];
    assert_eq!(join_string(shells.iter(), " "), "s p d");
    assert_eq!(join_string(std::iter::empty::<u8>(), ", "), "");
  }

  #[test]
  fn join_with_test() {
    let members = [(0, 'p'), (1, 's')];
    let joined = join_with(members.iter(), ",", |(i, c), out| write!(out, "{}{}", c, i));
    assert_eq!(joined, "p0,s1");
  }
}
