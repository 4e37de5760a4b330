//! Document tree traversal
//!
//! Given a [`Node`] tree and a parsed [`Pointer`], locate, replace, or remove
//! the addressed sub-node. The three traversal modes are three functions so
//! that write-mode container creation stays explicit and testable:
//!
//! - [`find`] traverses strictly and returns a reference,
//! - [`replace`] traverses the same way but creates intermediate empty
//!   mappings for missing non-final keys, and honors the `-` append marker,
//! - [`remove`] traverses strictly and deletes the addressed entry/element.
//!
//! Replace and remove rebuild the spine they walked and clone unchanged
//! branches, leaving the input tree untouched.

use crate::core::node::Node;
use crate::core::pointer::{Pointer, Token};
use crate::error::{OpsmithError, Result};

/// Locate the node addressed by `pointer`, read-only
pub fn find<'a>(root: &'a Node, pointer: &Pointer) -> Result<&'a Node> {
    let mut current = root;
    for token in pointer.tokens() {
        current = step(current, token)?;
    }
    Ok(current)
}

/// Produce a new tree with `value` substituted at the position `pointer`
/// addresses
///
/// An empty pointer replaces the whole tree.
pub fn replace(root: &Node, pointer: &Pointer, value: Node) -> Result<Node> {
    replace_tokens(root, pointer.tokens(), value)
}

/// Produce a new tree with the addressed entry or element deleted
pub fn remove(root: &Node, pointer: &Pointer) -> Result<Node> {
    remove_tokens(root, pointer.tokens())
}

fn step<'a>(node: &'a Node, token: &Token) -> Result<&'a Node> {
    match token {
        Token::Key(key) => match node {
            Node::Mapping(_) => node
                .get(key)
                .ok_or_else(|| missing_key(token, key)),
            other => Err(unexpected(token, "mapping", other)),
        },
        Token::Index(index) => match node {
            Node::Sequence(items) => items
                .get(*index)
                .ok_or_else(|| out_of_range(token, *index, items.len())),
            other => Err(unexpected(token, "sequence", other)),
        },
        Token::AfterLastIndex => Err(append_while_reading(token)),
        Token::MatchingKey { key, value } => match node {
            Node::Sequence(items) => matching_index(items, key, value)
                .map(|i| &items[i])
                .ok_or_else(|| no_match(token, key, value)),
            other => Err(unexpected(token, "sequence", other)),
        },
    }
}

fn replace_tokens(node: &Node, tokens: &[Token], value: Node) -> Result<Node> {
    let Some((token, rest)) = tokens.split_first() else {
        return Ok(value);
    };

    match token {
        Token::Key(key) => {
            let entries = match node {
                Node::Mapping(entries) => entries,
                other => return Err(unexpected(token, "mapping", other)),
            };
            let mut updated = entries.clone();
            match entries.iter().position(|(k, _)| k == key) {
                Some(pos) => {
                    updated[pos].1 = replace_tokens(&entries[pos].1, rest, value)?;
                }
                None => {
                    // Missing final key designates the insertion point; a
                    // missing intermediate key descends into a fresh mapping.
                    let child = replace_tokens(&Node::Mapping(Vec::new()), rest, value)?;
                    updated.push((key.clone(), child));
                }
            }
            Ok(Node::Mapping(updated))
        }
        Token::Index(index) => {
            let items = match node {
                Node::Sequence(items) => items,
                other => return Err(unexpected(token, "sequence", other)),
            };
            if *index >= items.len() {
                return Err(out_of_range(token, *index, items.len()));
            }
            let mut updated = items.clone();
            updated[*index] = replace_tokens(&items[*index], rest, value)?;
            Ok(Node::Sequence(updated))
        }
        Token::AfterLastIndex => {
            if !rest.is_empty() {
                return Err(OpsmithError::traversal(
                    token.to_string(),
                    "append marker must be the last path segment",
                ));
            }
            let items = match node {
                Node::Sequence(items) => items,
                other => return Err(unexpected(token, "sequence", other)),
            };
            let mut updated = items.clone();
            updated.push(value);
            Ok(Node::Sequence(updated))
        }
        Token::MatchingKey { key, value: wanted } => {
            let items = match node {
                Node::Sequence(items) => items,
                other => return Err(unexpected(token, "sequence", other)),
            };
            // Match tokens address existing elements only, even when writing.
            let pos = matching_index(items, key, wanted)
                .ok_or_else(|| no_match(token, key, wanted))?;
            let mut updated = items.clone();
            updated[pos] = replace_tokens(&items[pos], rest, value)?;
            Ok(Node::Sequence(updated))
        }
    }
}

fn remove_tokens(node: &Node, tokens: &[Token]) -> Result<Node> {
    let Some((token, rest)) = tokens.split_first() else {
        return Err(OpsmithError::traversal(
            "/",
            "cannot remove the document root",
        ));
    };

    match token {
        Token::Key(key) => {
            let entries = match node {
                Node::Mapping(entries) => entries,
                other => return Err(unexpected(token, "mapping", other)),
            };
            let pos = entries
                .iter()
                .position(|(k, _)| k == key)
                .ok_or_else(|| missing_key(token, key))?;
            let mut updated = entries.clone();
            if rest.is_empty() {
                updated.remove(pos);
            } else {
                updated[pos].1 = remove_tokens(&entries[pos].1, rest)?;
            }
            Ok(Node::Mapping(updated))
        }
        Token::Index(index) => {
            let items = match node {
                Node::Sequence(items) => items,
                other => return Err(unexpected(token, "sequence", other)),
            };
            if *index >= items.len() {
                return Err(out_of_range(token, *index, items.len()));
            }
            let mut updated = items.clone();
            if rest.is_empty() {
                updated.remove(*index);
            } else {
                updated[*index] = remove_tokens(&items[*index], rest)?;
            }
            Ok(Node::Sequence(updated))
        }
        Token::AfterLastIndex => Err(append_while_reading(token)),
        Token::MatchingKey { key, value } => {
            let items = match node {
                Node::Sequence(items) => items,
                other => return Err(unexpected(token, "sequence", other)),
            };
            let pos =
                matching_index(items, key, value).ok_or_else(|| no_match(token, key, value))?;
            let mut updated = items.clone();
            if rest.is_empty() {
                updated.remove(pos);
            } else {
                updated[pos] = remove_tokens(&items[pos], rest)?;
            }
            Ok(Node::Sequence(updated))
        }
    }
}

/// First sequence element that is a mapping whose `key` entry equals `value`
///
/// Non-mapping elements and non-string field values never match.
fn matching_index(items: &[Node], key: &str, value: &str) -> Option<usize> {
    items
        .iter()
        .position(|item| item.get(key).and_then(Node::as_str) == Some(value))
}

fn unexpected(token: &Token, expected: &str, found: &Node) -> OpsmithError {
    OpsmithError::traversal(
        token.to_string(),
        format!("expected a {}, found {}", expected, found.type_name()),
    )
}

fn missing_key(token: &Token, key: &str) -> OpsmithError {
    OpsmithError::traversal(token.to_string(), format!("missing key {:?}", key))
}

fn out_of_range(token: &Token, index: usize, len: usize) -> OpsmithError {
    OpsmithError::traversal(
        token.to_string(),
        format!("index {} out of range (length {})", index, len),
    )
}

fn no_match(token: &Token, key: &str, value: &str) -> OpsmithError {
    OpsmithError::traversal(
        token.to_string(),
        format!("no element matching {}={}", key, value),
    )
}

fn append_while_reading(token: &Token) -> OpsmithError {
    OpsmithError::traversal(
        token.to_string(),
        "append marker is only valid when writing",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Node {
        Node::from_bytes(text.as_bytes()).unwrap()
    }

    fn ptr(text: &str) -> Pointer {
        Pointer::parse(text).unwrap()
    }

    #[test]
    fn test_find_key_and_index() {
        let root = doc("items:\n- a\n- b\nname: top\n");
        assert_eq!(find(&root, &ptr("/name")).unwrap().as_str(), Some("top"));
        assert_eq!(find(&root, &ptr("/items/1")).unwrap().as_str(), Some("b"));
        assert_eq!(find(&root, &ptr("/")).unwrap(), &root);
    }

    #[test]
    fn test_find_matching_key_selects_first() {
        let root = doc("jobs:\n- name: web\n  port: 80\n- name: web\n  port: 81\n");
        let found = find(&root, &ptr("/jobs/name=web/port")).unwrap();
        assert_eq!(found, &Node::int(80));
    }

    #[test]
    fn test_find_matching_key_skips_non_mappings() {
        let root = doc("jobs:\n- plain\n- name: web\n  port: 80\n");
        let found = find(&root, &ptr("/jobs/name=web")).unwrap();
        assert_eq!(found.get("port"), Some(&Node::int(80)));
    }

    #[test]
    fn test_find_errors() {
        let root = doc("name: top\nitems:\n- a\n");
        assert!(find(&root, &ptr("/missing")).unwrap_err().is_traversal());
        assert!(find(&root, &ptr("/items/5")).unwrap_err().is_traversal());
        assert!(find(&root, &ptr("/items/-")).unwrap_err().is_traversal());
        // traversing through a scalar
        assert!(find(&root, &ptr("/name/deeper")).unwrap_err().is_traversal());
    }

    #[test]
    fn test_replace_existing_key_keeps_position() {
        let root = doc("a: 1\nb: 2\nc: 3\n");
        let updated = replace(&root, &ptr("/b"), Node::int(20)).unwrap();
        assert_eq!(updated.to_yaml_string().unwrap(), "a: 1\nb: 20\nc: 3\n");
    }

    #[test]
    fn test_replace_root() {
        let root = doc("a: 1\n");
        let updated = replace(&root, &Pointer::root(), Node::string("whole")).unwrap();
        assert_eq!(updated, Node::string("whole"));
    }

    #[test]
    fn test_replace_creates_intermediate_mappings() {
        let root = doc("top: here\n");
        let updated = replace(&root, &ptr("/a/b/c"), Node::int(1)).unwrap();
        assert_eq!(
            updated.to_yaml_string().unwrap(),
            "top: here\na:\n  b:\n    c: 1\n"
        );
        // the source tree is untouched
        assert_eq!(root.to_yaml_string().unwrap(), "top: here\n");
    }

    #[test]
    fn test_replace_appends_with_marker() {
        let root = doc("items:\n- a\n");
        let updated = replace(&root, &ptr("/items/-"), Node::string("b")).unwrap();
        assert_eq!(updated.to_yaml_string().unwrap(), "items:\n- a\n- b\n");
    }

    #[test]
    fn test_replace_append_marker_must_be_last() {
        let root = doc("items:\n- a\n");
        let err = replace(&root, &ptr("/items/-/x"), Node::int(1)).unwrap_err();
        assert!(err.is_traversal());
    }

    #[test]
    fn test_replace_index_equal_to_length_is_out_of_range() {
        let root = doc("items:\n- a\n");
        let err = replace(&root, &ptr("/items/1"), Node::string("b")).unwrap_err();
        assert!(err.is_traversal());
    }

    #[test]
    fn test_replace_matching_key_never_creates() {
        let root = doc("jobs:\n- name: web\n");
        let err = replace(&root, &ptr("/jobs/name=worker/port"), Node::int(1)).unwrap_err();
        assert!(err.is_traversal());
    }

    #[test]
    fn test_replace_through_matching_key() {
        let root = doc("jobs:\n- name: web\n  port: 80\n");
        let updated = replace(&root, &ptr("/jobs/name=web/port"), Node::int(8080)).unwrap();
        assert_eq!(
            updated.to_yaml_string().unwrap(),
            "jobs:\n- name: web\n  port: 8080\n"
        );
    }

    #[test]
    fn test_remove_mapping_entry() {
        let root = doc("a: 1\nb: 2\nc: 3\n");
        let updated = remove(&root, &ptr("/b")).unwrap();
        assert_eq!(updated.to_yaml_string().unwrap(), "a: 1\nc: 3\n");
    }

    #[test]
    fn test_remove_sequence_element_shifts_rest() {
        let root = doc("items:\n- a\n- b\n- c\n");
        let updated = remove(&root, &ptr("/items/1")).unwrap();
        assert_eq!(updated.to_yaml_string().unwrap(), "items:\n- a\n- c\n");
    }

    #[test]
    fn test_remove_matched_element() {
        let root = doc("jobs:\n- name: web\n- name: worker\n");
        let updated = remove(&root, &ptr("/jobs/name=web")).unwrap();
        assert_eq!(updated.to_yaml_string().unwrap(), "jobs:\n- name: worker\n");
    }

    #[test]
    fn test_remove_root_rejected() {
        let root = doc("a: 1\n");
        assert!(remove(&root, &Pointer::root()).unwrap_err().is_traversal());
    }

    #[test]
    fn test_remove_missing_path_rejected() {
        let root = doc("a: 1\n");
        assert!(remove(&root, &ptr("/b")).unwrap_err().is_traversal());
    }
}
