/// Splits chat text into bubble-sized chunks of at most `max_chars` characters.
///
/// Each cut happens at the last whitespace at or before the limit, and that
/// whitespace is dropped. A run without usable whitespace is hard-cut at the
/// limit. Text that already fits comes back as a single chunk.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut rest: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();

    while rest.len() > max_chars {
        // A separator at index 0 would yield an empty chunk.
        let separator = (1..=max_chars).rev().find(|&i| rest[i].is_whitespace());
        match separator {
            Some(at) => {
                chunks.push(rest[..at].iter().collect());
                rest.drain(..=at);
            }
            None => {
                chunks.push(rest[..max_chars].iter().collect());
                rest.drain(..max_chars);
            }
        }
    }

    if !rest.is_empty() || chunks.is_empty() {
        chunks.push(rest.into_iter().collect());
    }
    chunks
}
