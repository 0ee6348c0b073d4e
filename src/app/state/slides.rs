use crate::slides::SlideDeck;
use iced::widget::image;
use std::collections::HashMap;

pub struct SlidesState {
    pub(in crate::app) deck: SlideDeck,
    pub(in crate::app) images: HashMap<usize, image::Handle>,
    /// Distinguishes image fetches of a replaced deck.
    pub(in crate::app) deck_version: u64,
}

impl SlidesState {
    pub(in crate::app) fn new() -> Self {
        Self {
            deck: SlideDeck::default(),
            images: HashMap::new(),
            deck_version: 0,
        }
    }
}
