//! Image carousel used by the news and product galleries.

use std::rc::Rc;
use yew::Reducible;

/// Slide list and position of one gallery modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Carousel {
    slides: Vec<String>,
    index: usize,
    open: bool,
}

impl Carousel {
    /// Replace the slides and show the first one. Empty URLs are dropped.
    pub fn open(&mut self, images: impl IntoIterator<Item = String>) {
        self.slides = images.into_iter().filter(|src| !src.is_empty()).collect();
        self.index = 0;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn slides(&self) -> &[String] {
        &self.slides
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next(&mut self) {
        if !self.slides.is_empty() {
            self.index = (self.index + 1) % self.slides.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.slides.is_empty() {
            self.index = (self.index + self.slides.len() - 1) % self.slides.len();
        }
    }

    /// CSS transform for the slide strip.
    pub fn transform(&self) -> String {
        format!("translateX(-{}%)", self.index * 100)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselAction {
    Open(Vec<String>),
    Next,
    Prev,
    Close,
}

impl Reducible for Carousel {
    type Action = CarouselAction;

    fn reduce(self: Rc<Self>, action: CarouselAction) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            CarouselAction::Open(images) => next.open(images),
            CarouselAction::Next => next.next(),
            CarouselAction::Prev => next.prev(),
            CarouselAction::Close => next.close(),
        }
        Rc::new(next)
    }
}
