use crate::ocr::RecognizedFragment;

/// Join fragment texts into reading order: highest vertical position first,
/// one fragment per line. Fragments on the same position keep input order.
pub fn order_fragments(fragments: &[RecognizedFragment]) -> String {
    let mut sorted: Vec<&RecognizedFragment> = fragments.iter().collect();
    // sort_by is stable
    sorted.sort_by(|a, b| b.vertical_position.total_cmp(&a.vertical_position));

    sorted
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, y: f64) -> RecognizedFragment {
        RecognizedFragment {
            text: text.to_string(),
            vertical_position: y,
        }
    }

    #[test]
    fn top_of_page_first() {
        let frags = vec![frag("bottom", 0.1), frag("top", 0.9), frag("middle", 0.5)];
        assert_eq!(order_fragments(&frags), "top\nmiddle\nbottom");
    }

    #[test]
    fn ties_keep_input_order() {
        let frags = vec![
            frag("left", 0.5),
            frag("header", 0.9),
            frag("right", 0.5),
            frag("far right", 0.5),
        ];
        assert_eq!(order_fragments(&frags), "header\nleft\nright\nfar right");
    }

    #[test]
    fn nan_positions_sort_first_in_input_order() {
        let frags = vec![frag("a", f64::NAN), frag("b", 0.5), frag("c", f64::NAN)];
        assert_eq!(order_fragments(&frags), "a\nc\nb");
    }

    #[test]
    fn later_pages_and_signed_zero() {
        // second page lines carry negative positions
        let frags = vec![
            frag("page two", -0.2),
            frag("minus zero", -0.0),
            frag("zero", 0.0),
            frag("page one", 0.7),
        ];
        assert_eq!(
            order_fragments(&frags),
            "page one\nzero\nminus zero\npage two"
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(order_fragments(&[]), "");
    }

    #[test]
    fn single_fragment() {
        assert_eq!(order_fragments(&[frag("only", 0.3)]), "only");
    }
}
