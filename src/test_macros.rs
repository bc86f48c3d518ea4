#[macro_export]
macro_rules! reader_from_bytes {
    ($b : expr) => {{
        let buffer: &[u8] = $b.as_bytes();
        BufReader::new(buffer)
    }};
}

/// Build a document of `depth` nested arrays, e.g. `[[[]]]` for a depth of 3
#[macro_export]
macro_rules! nested_arrays {
    ($depth : expr) => {{
        let depth: usize = $depth;
        format!("{}{}", "[".repeat(depth), "]".repeat(depth))
    }};
}

/// Build a document of `depth` nested objects, each holding the next under the key "a"
#[macro_export]
macro_rules! nested_objects {
    ($depth : expr) => {{
        let depth: usize = $depth;
        let mut doc = "{\"a\":".repeat(depth - 1);
        doc.push_str("{}");
        doc.push_str(&"}".repeat(depth - 1));
        doc
    }};
}
