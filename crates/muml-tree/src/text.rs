use muml_tokenizer::is_whitespace_char;

/// Append a string literal to an element's (or document's) free text.
///
/// Consecutive literals are joined with a single space unless either side
/// already has whitespace at the seam. An empty literal adds a line break,
/// so `"a" "" "b"` reads as two lines.
pub fn append_text(text: &mut Option<String>, add: Option<&str>) {
    match add {
        None | Some("") => match text {
            Some(main) if !main.is_empty() => main.push('\n'),
            Some(_) => {}
            None => *text = add.map(str::to_owned),
        },
        Some(add) => match text {
            Some(main) if !main.is_empty() => {
                if !main.ends_with(is_whitespace_char) && !add.starts_with(is_whitespace_char) {
                    main.push(' ');
                }
                main.push_str(add);
            }
            _ => *text = Some(add.to_owned()),
        },
    }
}
