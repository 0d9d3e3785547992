pub mod split;
pub mod sweep;

/// Parses `a,b,c` into three integers.
pub fn parse_triple(value: &str) -> Result<[u32; 3], String> {
    let mut parts = value.split(',').map(|part| part.trim().parse::<u32>());
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(Ok(a)), Some(Ok(b)), Some(Ok(c)), None) => Ok([a, b, c]),
        _ => Err(format!("Invalid value: {value}. Expected three integers as a,b,c")),
    }
}
