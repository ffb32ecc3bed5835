use super::tree::Element;

/// Text of the first element named `target` within `subtree`.
///
/// The walk is pre-order and includes `subtree` itself, so when a tag
/// occurs at several depths the one earliest in document order wins.
/// Pass the narrowest subtree that holds the occurrence you want.
///
/// Returns `""` for a missing subtree, no match, or a match without text.
pub fn resolve(target: &str, subtree: Option<&Element>) -> String {
    let Some(root) = subtree else {
        return String::new();
    };
    root.descendants()
        .find(|el| el.local_name() == target)
        .map(|el| el.text().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nfe::tree::parse_tree;

    #[test]
    fn missing_subtree_is_empty() {
        assert_eq!(resolve("UF", None), "");
    }

    #[test]
    fn matches_the_subtree_root() {
        let root = parse_tree("<CFOP>5101</CFOP>").unwrap();
        assert_eq!(resolve("CFOP", Some(&root)), "5101");
    }

    #[test]
    fn no_match_or_no_text_is_empty() {
        let root = parse_tree("<emit><CNPJ/></emit>").unwrap();
        assert_eq!(resolve("IEST", Some(&root)), "");
        assert_eq!(resolve("CNPJ", Some(&root)), "");
    }

    #[test]
    fn ignores_prefixes() {
        let root =
            parse_tree("<nfe:emit><nfe:enderEmit><nfe:UF>SP</nfe:UF></nfe:enderEmit></nfe:emit>")
                .unwrap();
        assert_eq!(resolve("UF", Some(&root)), "SP");
    }

    #[test]
    fn first_match_in_document_order_not_shallowest() {
        let root = parse_tree("<a><b><x>deep</x></b><x>shallow</x></a>").unwrap();
        assert_eq!(resolve("x", Some(&root)), "deep");
    }

    #[test]
    fn text_is_not_trimmed() {
        let root = parse_tree("<a><IEST> 123 </IEST></a>").unwrap();
        assert_eq!(resolve("IEST", Some(&root)), " 123 ");
    }
}
