use dossier_docx::{
    trim_below_label, Block, Document, Package, ReplacementMap, RunFormat, Substituter,
    DOCUMENT_PART,
};
use tempfile::tempdir;

fn body(inner: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            r#"<w:body>{}<w:sectPr/></w:body></w:document>"#
        ),
        inner
    )
}

fn replacements(pairs: &[(&str, &str)]) -> ReplacementMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn first_paragraph(doc: &Document) -> &dossier_docx::Paragraph {
    doc.paragraphs().next().unwrap()
}

// ===== Paragraph Substitution =====

#[test]
fn test_substitution_consumes_whitespace_around_token() {
    let mut doc = Document::from_xml(&body(
        r#"<w:p><w:r><w:rPr><w:rFonts w:ascii="宋体"/><w:sz w:val="24"/></w:rPr><w:t xml:space="preserve">姓名：{1}　</w:t></w:r></w:p>"#,
    ))
    .unwrap();

    let sub = Substituter::new(&replacements(&[("{1}", "张三")])).unwrap();
    assert_eq!(sub.apply(&mut doc), 1);

    let paragraph = first_paragraph(&doc);
    assert_eq!(paragraph.text(), "姓名：张三");

    // the emptied original run stays, the new run carries its font
    let runs: Vec<_> = paragraph.runs().collect();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].text(), "");
    assert_eq!(
        runs[1].format(),
        RunFormat {
            font_name: Some("宋体".to_string()),
            east_asia_font: Some("宋体".to_string()),
            size: Some(24),
        }
    );
}

#[test]
fn test_non_breaking_hyphen_survives_rewrite() {
    let mut doc = Document::from_xml(&body(
        r#"<w:p><w:r><w:t>电话：0571</w:t><w:noBreakHyphen/><w:t>{5}</w:t></w:r></w:p>"#,
    ))
    .unwrap();

    let sub = Substituter::new(&replacements(&[("{5}", "88886666")])).unwrap();
    assert_eq!(sub.apply(&mut doc), 1);
    assert_eq!(first_paragraph(&doc).text(), "电话：0571-88886666");
}

#[test]
fn test_token_split_across_runs_is_replaced() {
    let mut doc = Document::from_xml(&body(
        r#"<w:p><w:r><w:t>电话：{</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>5</w:t></w:r><w:r><w:t>}</w:t></w:r></w:p>"#,
    ))
    .unwrap();

    let sub = Substituter::new(&replacements(&[("{5}", "13800138000")])).unwrap();
    sub.apply(&mut doc);

    assert_eq!(first_paragraph(&doc).text(), "电话：13800138000");
}

#[test]
fn test_paragraph_without_token_is_untouched() {
    let xml = body(
        r#"<w:p><w:r><w:rPr><w:i/></w:rPr><w:t>无占位</w:t></w:r><w:r><w:t xml:space="preserve"> 文本 </w:t></w:r></w:p>"#,
    );
    let mut doc = Document::from_xml(&xml).unwrap();
    let before = doc.clone();

    let sub = Substituter::new(&replacements(&[("{1}", "张三")])).unwrap();
    assert_eq!(sub.apply(&mut doc), 0);

    assert_eq!(doc, before);
    assert_eq!(doc.to_xml().unwrap(), before.to_xml().unwrap());
}

#[test]
fn test_empty_paragraph_is_unchanged() {
    let mut paragraph = dossier_docx::Paragraph::default();
    let sub = Substituter::new(&replacements(&[("{1}", "张三")])).unwrap();
    assert!(!sub.substitute(&mut paragraph));
    assert_eq!(paragraph.runs().count(), 0);
}

#[test]
fn test_table_cells_are_substituted() {
    let mut doc = Document::from_xml(&body(concat!(
        r#"<w:tbl><w:tr>"#,
        r#"<w:tc><w:p><w:r><w:t>{m}月{d}日</w:t></w:r></w:p></w:tc>"#,
        r#"<w:tc><w:tbl><w:tr><w:tc><w:p><w:r><w:t>{7}</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p/></w:tc>"#,
        r#"</w:tr></w:tbl>"#
    )))
    .unwrap();

    let sub = Substituter::new(&replacements(&[
        ("{m}", "9"),
        ("{d}", "1"),
        ("{7}", "杭州市人才服务中心"),
    ]))
    .unwrap();
    assert_eq!(sub.apply(&mut doc), 2);

    let mut texts = Vec::new();
    doc.for_each_paragraph_mut(&mut |p| texts.push(p.text()));
    assert_eq!(texts, vec!["9月1日", "杭州市人才服务中心", ""]);
}

// ===== Adjacent-Cell Trim =====

fn label_table(label: &str, value: &str) -> String {
    format!(
        concat!(
            r#"<w:tbl>"#,
            r#"<w:tr><w:tc><w:p><w:r><w:t xml:space="preserve"> {} </w:t></w:r></w:p></w:tc>"#,
            r#"<w:tc><w:p><w:r><w:t>其他</w:t></w:r></w:p></w:tc></w:tr>"#,
            r#"<w:tr><w:tc><w:p><w:r><w:rPr><w:rFonts w:ascii="仿宋"/><w:sz w:val="21"/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r></w:p></w:tc>"#,
            r#"<w:tc><w:p><w:r><w:t xml:space="preserve">　保留</w:t></w:r></w:p></w:tc></w:tr>"#,
            r#"</w:tbl>"#
        ),
        label, value
    )
}

fn cell_texts(doc: &Document) -> Vec<String> {
    let Some(Block::Table(table)) = doc.blocks().first() else {
        panic!("expected a table");
    };
    table
        .rows()
        .flat_map(|row| row.cells().map(|cell| cell.text()).collect::<Vec<_>>())
        .collect()
}

#[test]
fn test_trim_below_origin_label() {
    let mut doc = Document::from_xml(&body(&label_table("生源地", "　浙江省"))).unwrap();

    assert_eq!(trim_below_label(&mut doc, "生源地"), 1);
    assert_eq!(cell_texts(&doc), vec![" 生源地 ", "其他", "浙江省", "　保留"]);

    let Some(Block::Table(table)) = doc.blocks().first() else {
        panic!("expected a table");
    };
    let value_cell = table.rows().nth(1).unwrap().cells().next().unwrap();
    let paragraph = value_cell.paragraphs().next().unwrap();
    let runs: Vec<_> = paragraph.runs().collect();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].format().font_name.as_deref(), Some("仿宋"));
    assert_eq!(runs[0].format().east_asia_font.as_deref(), Some("仿宋"));
    assert_eq!(runs[0].format().size, Some(21));
}

#[test]
fn test_trim_ignores_other_labels() {
    let mut doc = Document::from_xml(&body(&label_table("民族", "　汉族"))).unwrap();
    let before = doc.clone();

    assert_eq!(trim_below_label(&mut doc, "生源地"), 0);
    assert_eq!(doc, before);
}

#[test]
fn test_trim_skips_value_without_leading_space() {
    let mut doc = Document::from_xml(&body(&label_table("生源地", "浙江省"))).unwrap();
    let before = doc.clone();

    assert_eq!(trim_below_label(&mut doc, "生源地"), 0);
    assert_eq!(doc, before);
}

// ===== Package Round Trip =====

#[test]
fn test_open_substitute_save() {
    let dir = tempdir().unwrap();
    let template = dir.path().join("template.docx");
    let output = dir.path().join("filled.docx");

    let xml = body(r#"<w:p><w:r><w:t>{1}</w:t></w:r></w:p>"#);
    let mut package = Package::default();
    package.set_part("[Content_Types].xml", b"<Types/>".to_vec());
    package.save_with(&template, (DOCUMENT_PART, xml.as_bytes())).unwrap();

    let mut doc = Document::open(&template).unwrap();
    Substituter::new(&replacements(&[("{1}", "李四")]))
        .unwrap()
        .apply(&mut doc);
    doc.save(&output).unwrap();

    let reopened = Document::open(&output).unwrap();
    assert_eq!(first_paragraph(&reopened).text(), "李四");

    let package = Package::open(&output).unwrap();
    assert_eq!(package.part("[Content_Types].xml").unwrap(), b"<Types/>");
}

#[test]
fn test_open_rejects_package_without_document_part() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.docx");

    let package = Package::default();
    package.save_with(&path, ("docProps/core.xml", b"<x/>")).unwrap();

    assert!(matches!(
        Document::open(&path),
        Err(dossier_docx::DocxError::MissingPart(_))
    ));
}
