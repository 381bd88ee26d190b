//! Question images as PDF image XObjects

use crate::Result;
use crate::types::{Question, QuestionId};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::{DynamicImage, RgbImage};
use lopdf::{Dictionary, Object, Stream};
use std::collections::HashMap;
use std::io::Write;

/// A decoded image, stored as Flate-compressed 8-bit RGB
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    pub width: u32,
    pub height: u32,
    data: Vec<u8>,
}

impl EmbeddedImage {
    /// Decode PNG or JPEG bytes
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)?;
        Self::from_image(&image)
    }

    pub fn from_image(image: &DynamicImage) -> Result<Self> {
        let rgb = flatten_on_white(image);
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(rgb.as_raw())?;
        let data = encoder.finish()?;

        Ok(Self {
            width: rgb.width(),
            height: rgb.height(),
            data,
        })
    }

    pub(crate) fn to_stream(&self) -> Stream {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", Object::Name(b"Image".to_vec()));
        dict.set("Width", Object::Integer(self.width as i64));
        dict.set("Height", Object::Integer(self.height as i64));
        dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
        dict.set("BitsPerComponent", Object::Integer(8));
        dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
        Stream::new(dict, self.data.clone())
    }
}

/// Composite transparent pixels onto white so cut-out crops stay readable
fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Images keyed by question id
#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    images: HashMap<QuestionId, EmbeddedImage>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: QuestionId, image: EmbeddedImage) {
        self.images.insert(id, image);
    }

    pub fn get(&self, id: &QuestionId) -> Option<&EmbeddedImage> {
        self.images.get(id)
    }

    pub fn contains(&self, id: &QuestionId) -> bool {
        self.images.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Fill in width/height of questions that have none, from the decoded
    /// images
    pub fn fill_missing_dimensions(&self, questions: &mut [Question]) {
        for question in questions.iter_mut().filter(|q| !q.has_dimensions()) {
            if let Some(image) = self.images.get(&question.id) {
                question.width = Some(image.width);
                question.height = Some(image.height);
            }
        }
    }
}

/// Load and decode the image of every question from disk
pub async fn load_images(questions: &[Question]) -> Result<ImageStore> {
    let mut store = ImageStore::new();

    for question in questions {
        if store.contains(&question.id) {
            continue;
        }

        let bytes = tokio::fs::read(&question.image).await.map_err(|e| {
            log::warn!("Failed to read image {}: {}", question.image, e);
            e
        })?;
        let image = tokio::task::spawn_blocking(move || EmbeddedImage::decode(&bytes)).await??;
        store.insert(question.id.clone(), image);
    }

    log::debug!("Loaded {} question images", store.len());
    Ok(store)
}
