use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// A parsed page. Lookups return `Option`/empty `Vec` instead of failing, so
/// callers decide which missing structure is fatal.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    pub fn select(&self, selector: &Selector) -> Vec<Node<'_>> {
        self.html.select(selector).map(Node).collect()
    }

    pub fn select_one(&self, selector: &Selector) -> Option<Node<'_>> {
        self.html.select(selector).next().map(Node)
    }

    /// Every `<a>` carrying an `href`, in document order.
    pub fn anchors(&self) -> Vec<Node<'_>> {
        self.select(&ANCHOR_SEL)
    }
}

/// Element handle inside a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'a>(ElementRef<'a>);

impl<'a> Node<'a> {
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    /// First class listed in the `class` attribute, as written.
    pub fn first_class(&self) -> Option<&'a str> {
        self.attr("class")?.split_whitespace().next()
    }

    /// Concatenated text of all descendants, untrimmed.
    pub fn text(&self) -> String {
        self.0.text().collect()
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.0.parent().and_then(ElementRef::wrap).map(Node)
    }

    /// Element `levels` steps up; `ancestor(1)` is the parent.
    pub fn ancestor(&self, levels: usize) -> Option<Node<'a>> {
        let mut node = *self;
        for _ in 0..levels {
            node = node.parent()?;
        }
        Some(node)
    }

    /// Direct element children with the given tag name.
    pub fn child_elements(&self, tag: &str) -> Vec<Node<'a>> {
        self.0
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|e| e.value().name() == tag)
            .map(Node)
            .collect()
    }

    /// Closest following sibling element with the given tag name.
    pub fn next_sibling(&self, tag: &str) -> Option<Node<'a>> {
        self.0
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().name() == tag)
            .map(Node)
    }

    /// All descendant elements with the given tag name, in document order.
    pub fn descendants(&self, tag: &str) -> Vec<Node<'a>> {
        self.0
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .filter(|e| e.value().name() == tag)
            .map(Node)
            .collect()
    }

    pub fn select(&self, selector: &Selector) -> Vec<Node<'a>> {
        self.0.select(selector).map(Node).collect()
    }
}
