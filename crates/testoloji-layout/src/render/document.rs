//! Document assembly

use super::images::{ImageStore, load_images};
use super::page::{AnswerKeyPlacement, PageRenderer, WATERMARK_GSTATE};
use super::text::{FONT_BOLD, FONT_REGULAR, info_string};
use crate::answer_key::answer_key;
use crate::constants::WATERMARK_OPACITY;
use crate::options::LayoutOptions;
use crate::paginate::{Column, Page, paginate};
use crate::types::{Question, QuestionId};
use crate::{LayoutError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::HashMap;
use std::path::Path;

/// Shared resources every page points at
struct SharedResources {
    fonts: Dictionary,
    ext_gstates: Dictionary,
}

impl SharedResources {
    fn new(doc: &mut Document) -> Self {
        let mut fonts = Dictionary::new();
        for (name, base_font) in [(FONT_REGULAR, "Helvetica"), (FONT_BOLD, "Helvetica-Bold")] {
            let mut font_dict = Dictionary::new();
            font_dict.set("Type", Object::Name(b"Font".to_vec()));
            font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
            font_dict.set("BaseFont", Object::Name(base_font.as_bytes().to_vec()));
            font_dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
            let font_id = doc.add_object(font_dict);
            fonts.set(name.as_bytes(), Object::Reference(font_id));
        }

        let mut gstate = Dictionary::new();
        gstate.set("Type", Object::Name(b"ExtGState".to_vec()));
        gstate.set("ca", Object::Real(WATERMARK_OPACITY));
        gstate.set("CA", Object::Real(WATERMARK_OPACITY));
        let gstate_id = doc.add_object(gstate);
        let mut ext_gstates = Dictionary::new();
        ext_gstates.set(WATERMARK_GSTATE.as_bytes(), Object::Reference(gstate_id));

        Self { fonts, ext_gstates }
    }
}

/// Render paginated questions into a PDF document
pub fn render_document(
    pages: &[Page],
    options: &LayoutOptions,
    images: &ImageStore,
) -> Result<Document> {
    if pages.is_empty() {
        return Err(LayoutError::NoQuestions);
    }

    let renderer = PageRenderer::new(options, images);
    let geometry = *renderer.geometry();

    let mut doc = Document::with_version("1.7");
    let pages_tree_id = doc.new_object_id();
    let shared = SharedResources::new(&mut doc);
    let mut image_cache: HashMap<QuestionId, ObjectId> = HashMap::new();

    // The key shares the last page when it fits below the taller column
    let key_entries = if options.show_answer_key {
        answer_key(pages)
    } else {
        Vec::new()
    };
    let mut page_list: Vec<Page> = pages.to_vec();
    let mut key_page = None;
    if !key_entries.is_empty() {
        let key_height = PageRenderer::answer_key_height(key_entries.len());
        let last = page_list.len() - 1;
        let used = page_list[last]
            .column_height(Column::Left)
            .max(page_list[last].column_height(Column::Right));

        if geometry.usable_height() - used >= key_height {
            key_page = Some((last, geometry.content_top - used));
        } else {
            page_list.push(Page::default());
            key_page = Some((page_list.len() - 1, geometry.content_top));
        }
    }

    let count = page_list.len();
    let mut page_refs = Vec::with_capacity(count);

    for (idx, page) in page_list.iter().enumerate() {
        let key = key_page
            .filter(|(key_idx, _)| *key_idx == idx)
            .map(|(_, top)| AnswerKeyPlacement {
                entries: &key_entries,
                top,
            });
        let content = renderer.render(page, idx + 1, count, key);

        let mut xobjects = Dictionary::new();
        for (name, id) in &content.images {
            let image_id = match image_cache.get(id) {
                Some(&image_id) => image_id,
                None => {
                    let Some(image) = images.get(id) else {
                        continue;
                    };
                    let image_id = doc.add_object(image.to_stream());
                    image_cache.insert(id.clone(), image_id);
                    image_id
                }
            };
            xobjects.set(name.as_bytes(), Object::Reference(image_id));
        }

        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(shared.fonts.clone()));
        resources.set("ExtGState", Object::Dictionary(shared.ext_gstates.clone()));
        if !xobjects.is_empty() {
            resources.set("XObject", Object::Dictionary(xobjects));
        }

        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.ops.into_bytes()));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(pages_tree_id));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(geometry.page_width),
                Object::Real(geometry.page_height),
            ]),
        );
        page_dict.set("Resources", Object::Dictionary(resources));
        page_dict.set("Contents", Object::Reference(content_id));
        page_refs.push(Object::Reference(doc.add_object(page_dict)));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count as i64)),
    ]);
    doc.objects.insert(pages_tree_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    if !options.title.is_empty() {
        let info_id = doc.add_object(Dictionary::from_iter(vec![
            (
                "Title",
                Object::String(info_string(&options.title), StringFormat::Hexadecimal),
            ),
            (
                "Producer",
                Object::String(b"testoloji".to_vec(), StringFormat::Literal),
            ),
        ]));
        doc.trailer.set("Info", info_id);
    }

    log::info!(
        "Rendered {} pages ({} images embedded, template {})",
        count,
        image_cache.len(),
        options.template
    );
    Ok(doc)
}

/// Load images, paginate and render in one go
pub async fn render_pdf(questions: &[Question], options: &LayoutOptions) -> Result<Document> {
    options.validate()?;
    if questions.is_empty() {
        return Err(LayoutError::NoQuestions);
    }

    let images = load_images(questions).await?;
    let mut questions = questions.to_vec();
    images.fill_missing_dimensions(&mut questions);

    let options = options.clone();
    tokio::task::spawn_blocking(move || {
        let pages = paginate(&questions, &options.pagination_config());
        render_document(&pages, &options, &images)
    })
    .await?
}

/// Save a rendered document
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, LayoutError>(writer)
    })
    .await??;
    tokio::fs::write(&path, bytes).await?;
    log::info!("Saved PDF to {}", path.display());
    Ok(())
}
