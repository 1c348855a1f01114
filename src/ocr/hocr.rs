use std::sync::LazyLock;

use anyhow::Result;
use quick_xml::events::{BytesStart, Event};
use regex::Regex;

use super::RecognizedFragment;

static BBOX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"bbox (-?\d+) (-?\d+) (-?\d+) (-?\d+)").unwrap());

const LINE_CLASSES: &[&str] = &["ocr_line", "ocr_header", "ocr_caption", "ocr_textfloat"];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Line,
    Word,
    Other,
}

struct LineBuf {
    top: f64,
    words: Vec<String>,
}

/// Parse tesseract hOCR output into one fragment per text line.
///
/// hOCR boxes are in pixels from the top-left corner, so each line's top edge
/// is flipped and normalized against its page height: 1.0 is the top of the
/// first page, 0.0 its bottom, and every following page sits one unit lower.
pub fn parse_hocr(xml: &str) -> Result<Vec<RecognizedFragment>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut stack: Vec<Node> = Vec::new();
    let mut fragments = Vec::new();

    let mut page_index: i64 = -1;
    let mut page_height: Option<f64> = None;
    let mut line: Option<LineBuf> = None;
    let mut word = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let class = class_of(&e)?;
                let node = match class.as_deref() {
                    Some("ocr_page") => {
                        page_index += 1;
                        page_height = bbox_of(&e)?
                            .map(|[_, y0, _, y1]| y1 - y0)
                            .filter(|h| *h > 0.0);
                        Node::Other
                    }
                    Some(c) if LINE_CLASSES.contains(&c) => {
                        let top = bbox_of(&e)?.map(|b| b[1]).unwrap_or_default();
                        line = Some(LineBuf {
                            top,
                            words: Vec::new(),
                        });
                        Node::Line
                    }
                    Some("ocrx_word") => {
                        word.clear();
                        Node::Word
                    }
                    _ => Node::Other,
                };
                stack.push(node);
            }
            Event::Text(e) if stack.contains(&Node::Word) => {
                word.push_str(&e.unescape()?);
            }
            Event::End(_) => match stack.pop() {
                Some(Node::Word) => {
                    let w = word.trim();
                    if let (Some(l), false) = (line.as_mut(), w.is_empty()) {
                        l.words.push(w.to_string());
                    }
                }
                Some(Node::Line) => {
                    if let Some(l) = line.take().filter(|l| !l.words.is_empty()) {
                        let offset = page_index.max(0) as f64;
                        let position = match page_height {
                            Some(h) => 1.0 - l.top / h,
                            None => -l.top,
                        };
                        fragments.push(RecognizedFragment {
                            text: l.words.join(" "),
                            vertical_position: position - offset,
                        });
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(fragments)
}

fn class_of(e: &BytesStart) -> Result<Option<String>> {
    match e.try_get_attribute("class")? {
        Some(attr) => Ok(Some(attr.unescape_value()?.trim().to_string())),
        None => Ok(None),
    }
}

/// `title='bbox x0 y0 x1 y1; ...'` → `[x0, y0, x1, y1]`
fn bbox_of(e: &BytesStart) -> Result<Option<[f64; 4]>> {
    let Some(attr) = e.try_get_attribute("title")? else {
        return Ok(None);
    };
    let title = attr.unescape_value()?;
    Ok(BBOX_RE.captures(&title).map(|caps| {
        let n = |i: usize| caps[i].parse::<f64>().unwrap_or_default();
        [n(1), n(2), n(3), n(4)]
    }))
}
