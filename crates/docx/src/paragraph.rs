use crate::xml::{XmlElement, XmlNode};

pub(crate) const W_P: &str = "w:p";
const W_PPR: &str = "w:pPr";
const W_R: &str = "w:r";
const W_RPR: &str = "w:rPr";
const W_T: &str = "w:t";
const W_TAB: &str = "w:tab";
const W_BR: &str = "w:br";
const W_CR: &str = "w:cr";
const W_PTAB: &str = "w:ptab";
const W_NO_BREAK_HYPHEN: &str = "w:noBreakHyphen";
const W_RFONTS: &str = "w:rFonts";
const W_SZ: &str = "w:sz";

/// Character formatting carried from one run to another.
///
/// `size` is in half-points, as stored in `w:sz`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFormat {
    pub font_name: Option<String>,
    pub east_asia_font: Option<String>,
    pub size: Option<u32>,
}

impl RunFormat {
    fn is_empty(&self) -> bool {
        self.font_name.is_none() && self.east_asia_font.is_none() && self.size.is_none()
    }

    fn to_properties(&self) -> Option<XmlElement> {
        if self.is_empty() {
            return None;
        }

        let mut properties = XmlElement::new(W_RPR);
        if self.font_name.is_some() || self.east_asia_font.is_some() {
            let mut fonts = XmlElement::new(W_RFONTS);
            if let Some(name) = &self.font_name {
                fonts.set_attribute("w:ascii", name);
                fonts.set_attribute("w:hAnsi", name);
            }
            if let Some(name) = &self.east_asia_font {
                fonts.set_attribute("w:eastAsia", name);
            }
            properties = properties.with_child(fonts);
        }
        if let Some(size) = self.size {
            properties =
                properties.with_child(XmlElement::new(W_SZ).with_attribute("w:val", &size.to_string()));
        }
        Some(properties)
    }
}

/// A run of text sharing one set of character properties (`w:r`)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Run {
    attributes: Vec<(String, String)>,
    properties: Option<XmlElement>,
    content: Vec<XmlNode>,
}

impl Run {
    /// Create a run holding `text` with the given formatting
    #[must_use]
    pub fn with_format(text: &str, format: &RunFormat) -> Self {
        let mut run = Self {
            properties: format.to_properties(),
            ..Self::default()
        };
        run.set_text(text);
        run
    }

    pub(crate) fn from_element(element: XmlElement) -> Self {
        let mut properties = None;
        let mut content = Vec::new();
        for node in element.children {
            match node {
                XmlNode::Element(child) if child.name == W_RPR && properties.is_none() => {
                    properties = Some(child);
                }
                other => content.push(other),
            }
        }
        Self {
            attributes: element.attributes,
            properties,
            content,
        }
    }

    pub(crate) fn into_element(self) -> XmlElement {
        let mut children = Vec::with_capacity(self.content.len() + 1);
        if let Some(properties) = self.properties {
            children.push(XmlNode::Element(properties));
        }
        children.extend(self.content);
        XmlElement {
            name: W_R.to_string(),
            attributes: self.attributes,
            children,
        }
    }

    /// Text of the run; tabs map to `\t`, line breaks to `\n` and
    /// non-breaking hyphens to `-`
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.content {
            let XmlNode::Element(el) = node else { continue };
            match el.name.as_str() {
                W_T => out.push_str(&el.text()),
                W_TAB | W_PTAB => out.push('\t'),
                W_NO_BREAK_HYPHEN => out.push('-'),
                W_CR => out.push('\n'),
                W_BR => match el.attribute("w:type") {
                    None | Some("textWrapping") => out.push('\n'),
                    Some(_) => {}
                },
                _ => {}
            }
        }
        out
    }

    /// Replace the run's content with `text`, keeping its properties
    pub fn set_text(&mut self, text: &str) {
        self.content.clear();
        let mut pending = String::new();
        for ch in text.chars() {
            match ch {
                '\t' | '\n' | '\r' => {
                    self.flush_text(&mut pending);
                    let name = if ch == '\t' { W_TAB } else { W_BR };
                    self.content.push(XmlNode::Element(XmlElement::new(name)));
                }
                _ => pending.push(ch),
            }
        }
        self.flush_text(&mut pending);
    }

    fn flush_text(&mut self, pending: &mut String) {
        if pending.is_empty() {
            return;
        }
        let mut t = XmlElement::new(W_T);
        if pending.starts_with(char::is_whitespace) || pending.ends_with(char::is_whitespace) {
            t.set_attribute("xml:space", "preserve");
        }
        t = t.with_text(pending);
        self.content.push(XmlNode::Element(t));
        pending.clear();
    }

    /// Formatting set directly on this run
    #[must_use]
    pub fn format(&self) -> RunFormat {
        let Some(properties) = &self.properties else {
            return RunFormat::default();
        };
        let fonts = properties.child(W_RFONTS);
        RunFormat {
            font_name: fonts.and_then(|f| f.attribute("w:ascii")).map(str::to_string),
            east_asia_font: fonts
                .and_then(|f| f.attribute("w:eastAsia"))
                .map(str::to_string),
            size: properties
                .child(W_SZ)
                .and_then(|sz| sz.attribute("w:val"))
                .and_then(|val| val.parse().ok()),
        }
    }
}

/// Content of a paragraph other than its properties
#[derive(Debug, Clone, PartialEq)]
enum Inline {
    Run(Run),
    Other(XmlNode),
}

/// A paragraph (`w:p`): properties plus runs and other inline markup
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    attributes: Vec<(String, String)>,
    properties: Option<XmlElement>,
    content: Vec<Inline>,
}

impl Paragraph {
    pub(crate) fn from_element(element: XmlElement) -> Self {
        let mut properties = None;
        let mut content = Vec::new();
        for node in element.children {
            match node {
                XmlNode::Element(child) if child.name == W_PPR && properties.is_none() => {
                    properties = Some(child);
                }
                XmlNode::Element(child) if child.name == W_R => {
                    content.push(Inline::Run(Run::from_element(child)));
                }
                other => content.push(Inline::Other(other)),
            }
        }
        Self {
            attributes: element.attributes,
            properties,
            content,
        }
    }

    pub(crate) fn into_element(self) -> XmlElement {
        let mut children = Vec::with_capacity(self.content.len() + 1);
        if let Some(properties) = self.properties {
            children.push(XmlNode::Element(properties));
        }
        children.extend(self.content.into_iter().map(|inline| match inline {
            Inline::Run(run) => XmlNode::Element(run.into_element()),
            Inline::Other(node) => node,
        }));
        XmlElement {
            name: W_P.to_string(),
            attributes: self.attributes,
            children,
        }
    }

    /// Runs directly inside the paragraph, in order
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.content.iter().filter_map(|inline| match inline {
            Inline::Run(run) => Some(run),
            Inline::Other(_) => None,
        })
    }

    pub fn runs_mut(&mut self) -> impl Iterator<Item = &mut Run> {
        self.content.iter_mut().filter_map(|inline| match inline {
            Inline::Run(run) => Some(run),
            Inline::Other(_) => None,
        })
    }

    /// Concatenated text of the paragraph's runs
    #[must_use]
    pub fn text(&self) -> String {
        self.runs().map(Run::text).collect()
    }

    /// Empty every run's content; the runs and their properties stay
    pub fn clear_run_text(&mut self) {
        for run in self.runs_mut() {
            run.set_text("");
        }
    }

    /// Remove all content, keeping paragraph properties
    pub fn clear(&mut self) {
        self.content.clear();
    }

    pub fn push_run(&mut self, run: Run) {
        self.content.push(Inline::Run(run));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlDocument;

    fn parse_paragraph(xml: &str) -> Paragraph {
        Paragraph::from_element(XmlDocument::parse(xml).unwrap().root)
    }

    #[test]
    fn test_text_joins_split_runs() {
        let p = parse_paragraph(
            r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>{</w:t></w:r><w:proofErr/><w:r><w:t>1}</w:t></w:r></w:p>"#,
        );
        assert_eq!(p.text(), "{1}");
        assert_eq!(p.runs().count(), 2);
    }

    #[test]
    fn test_run_text_maps_tabs_and_breaks() {
        let p = parse_paragraph(
            r#"<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t><w:br w:type="page"/></w:r></w:p>"#,
        );
        assert_eq!(p.text(), "a\tb\nc");
    }

    #[test]
    fn test_run_text_maps_hyphens_and_positional_tabs() {
        let p = parse_paragraph(
            r#"<w:p><w:r><w:t>0571</w:t><w:noBreakHyphen/><w:t>8888</w:t><w:ptab w:relativeTo="margin" w:alignment="right" w:leader="none"/><w:t>x</w:t></w:r></w:p>"#,
        );
        assert_eq!(p.text(), "0571-8888\tx");
    }

    #[test]
    fn test_set_text_round_trips() {
        let mut run = Run::with_format("x", &RunFormat::default());
        run.set_text(" lead\ttab\nline ");
        assert_eq!(run.text(), " lead\ttab\nline ");
        let back = Run::from_element(run.clone().into_element());
        assert_eq!(back, run);
    }

    #[test]
    fn test_format_reads_fonts_and_size() {
        let p = parse_paragraph(
            r#"<w:p><w:r><w:rPr><w:rFonts w:ascii="宋体" w:eastAsia="宋体"/><w:sz w:val="24"/></w:rPr><w:t>x</w:t></w:r></w:p>"#,
        );
        let format = p.runs().next().unwrap().format();
        assert_eq!(format.font_name.as_deref(), Some("宋体"));
        assert_eq!(format.east_asia_font.as_deref(), Some("宋体"));
        assert_eq!(format.size, Some(24));
    }

    #[test]
    fn test_with_format_writes_properties() {
        let format = RunFormat {
            font_name: Some("仿宋".to_string()),
            east_asia_font: Some("仿宋".to_string()),
            size: Some(28),
        };
        let run = Run::with_format("值", &format);
        assert_eq!(run.format(), format);
        assert_eq!(run.text(), "值");

        let plain = Run::with_format("值", &RunFormat::default());
        assert_eq!(plain.format(), RunFormat::default());
        assert!(plain.into_element().child(W_RPR).is_none());
    }

    #[test]
    fn test_clear_run_text_keeps_runs() {
        let mut p = parse_paragraph(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>a</w:t></w:r><w:r><w:t>b</w:t></w:r></w:p>"#,
        );
        p.clear_run_text();
        assert_eq!(p.runs().count(), 2);
        assert_eq!(p.text(), "");

        p.clear();
        assert_eq!(p.runs().count(), 0);
    }

    #[test]
    fn test_clear_keeps_paragraph_properties() {
        let mut p = parse_paragraph(
            r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>a</w:t></w:r></w:p>"#,
        );
        p.clear();
        let element = p.into_element();
        assert!(element.child(W_PPR).is_some());
        assert!(element.child(W_R).is_none());
    }
}
