#![allow(dead_code)]

/// Build a document of `count` records, mixing every kind of value
pub fn generated_document(count: usize) -> String {
    let records: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"id":{},"name":"record {}","escaped":"tab\tquote\"","ratio":{}.125e-3,"flags":[true,false,null],"nested":{{"depth":[[{}],[]]}}}}"#,
                i, i, i, i
            )
        })
        .collect();
    format!("[{}]", records.join(",\n"))
}

/// `depth` nested arrays
pub fn nested_document(depth: usize) -> String {
    format!("{}{}", "[".repeat(depth), "]".repeat(depth))
}
