//! Small text helpers shared by the resolver and the dispatcher.

/// Title-cases `text` word by word.
///
/// A letter is upper-cased when it does not follow another letter and
/// lower-cased otherwise, so `"p/e ratio"` becomes `"P/E Ratio"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(ch);
            previous_is_letter = false;
        }
    }

    out
}
