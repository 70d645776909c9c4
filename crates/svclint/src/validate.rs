pub fn validate_shape_id(id: &str) -> Result<(), String> {
    let id = id.trim();
    if id.is_empty() {
        return Err("shape id must not be empty".to_string());
    }
    let Some((namespace, name)) = id.split_once('#') else {
        return Err(format!(
            "invalid shape id (expected `namespace#Name`): {id:?}"
        ));
    };
    if namespace.is_empty() {
        return Err(format!("invalid shape id (empty namespace): {id:?}"));
    }
    if name.contains('#') {
        return Err(format!(
            "invalid shape id (more than one `#` separator): {id:?}"
        ));
    }
    for seg in namespace.split('.') {
        if seg.is_empty() {
            return Err(format!(
                "invalid shape id namespace (empty segment): {id:?}"
            ));
        }
        validate_ident(seg).map_err(|e| format!("invalid shape id namespace: {id:?}: {e}"))?;
    }
    validate_ident(name).map_err(|e| format!("invalid shape id name: {id:?}: {e}"))?;
    Ok(())
}

pub fn validate_external_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("external resource name must be non-empty".to_string());
    }
    for c in name.chars() {
        if c == '#' || c.is_whitespace() {
            return Err(format!(
                "invalid external resource name char (no `#` or whitespace): {name:?}"
            ));
        }
    }
    Ok(())
}

fn validate_ident(seg: &str) -> Result<(), String> {
    if seg.is_empty() {
        return Err("segment must be non-empty".to_string());
    }
    let mut chars = seg.chars();
    let first = chars.next().unwrap_or('_');
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(format!(
            "invalid segment start (must be [A-Za-z_]): segment={seg:?}"
        ));
    }
    for c in chars {
        if !(c.is_ascii_alphanumeric() || c == '_') {
            return Err(format!(
                "invalid segment char (allowed [A-Za-z0-9_]): segment={seg:?}"
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_shape_ids() {
        assert!(validate_shape_id("example.weather#Weather").is_ok());
        assert!(validate_shape_id("ns#City").is_ok());
        assert!(validate_shape_id("a.b.c#_Internal").is_ok());
    }

    #[test]
    fn rejects_malformed_shape_ids() {
        assert!(validate_shape_id("").is_err());
        assert!(validate_shape_id("NoSeparator").is_err());
        assert!(validate_shape_id("#Name").is_err());
        assert!(validate_shape_id("ns#").is_err());
        assert!(validate_shape_id("ns##Name").is_err());
        assert!(validate_shape_id("ns.#Name").is_err());
        assert!(validate_shape_id("1ns#Name").is_err());
        assert!(validate_shape_id("ns#Na me").is_err());
    }

    #[test]
    fn external_name_rules() {
        assert!(validate_external_name("city").is_ok());
        assert!(validate_external_name("my-city").is_ok());
        assert!(validate_external_name("").is_err());
        assert!(validate_external_name("  ").is_err());
        assert!(validate_external_name("a#b").is_err());
        assert!(validate_external_name("a b").is_err());
    }
}
