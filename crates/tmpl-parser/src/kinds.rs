//! Static element vocabulary.
//!
//! Every known HTML element name maps to an [`ElementKind`], which carries
//! the few facts the tree builder, the formatter and the completions helper
//! need: void-ness, tokenizer mode, optional end tags, categories and a
//! coarse content model. Content models drive layout and suggestions only;
//! they are not a validity checker.

use crate::tokenizer::Mode;

macro_rules! elements {
    ($($variant:ident => $name:literal,)*) => {
        /// A known HTML element.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ElementKind {
            $(
                #[doc = concat!("`<", $name, ">`")]
                $variant,
            )*
        }

        impl ElementKind {
            /// Every known element, in alphabetical order.
            pub const ALL: &'static [ElementKind] = &[$(ElementKind::$variant,)*];

            /// The canonical (lower-case) tag name.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(ElementKind::$variant => $name,)*
                }
            }

            fn from_lowercase(name: &str) -> Option<ElementKind> {
                match name {
                    $($name => Some(ElementKind::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

elements! {
    A => "a",
    Abbr => "abbr",
    Acronym => "acronym",
    Address => "address",
    Applet => "applet",
    Area => "area",
    Article => "article",
    Aside => "aside",
    Audio => "audio",
    B => "b",
    Base => "base",
    Basefont => "basefont",
    Bdi => "bdi",
    Bdo => "bdo",
    Bgsound => "bgsound",
    Big => "big",
    Blink => "blink",
    Blockquote => "blockquote",
    Body => "body",
    Br => "br",
    Button => "button",
    Canvas => "canvas",
    Caption => "caption",
    Center => "center",
    Cite => "cite",
    Code => "code",
    Col => "col",
    Colgroup => "colgroup",
    Data => "data",
    Datalist => "datalist",
    Dd => "dd",
    Del => "del",
    Details => "details",
    Dfn => "dfn",
    Dialog => "dialog",
    Dir => "dir",
    Div => "div",
    Dl => "dl",
    Dt => "dt",
    Em => "em",
    Embed => "embed",
    Fieldset => "fieldset",
    Figcaption => "figcaption",
    Figure => "figure",
    Font => "font",
    Footer => "footer",
    Form => "form",
    Frame => "frame",
    Frameset => "frameset",
    H1 => "h1",
    H2 => "h2",
    H3 => "h3",
    H4 => "h4",
    H5 => "h5",
    H6 => "h6",
    Head => "head",
    Header => "header",
    Hgroup => "hgroup",
    Hr => "hr",
    Html => "html",
    I => "i",
    Iframe => "iframe",
    Img => "img",
    Input => "input",
    Ins => "ins",
    Isindex => "isindex",
    Kbd => "kbd",
    Keygen => "keygen",
    Label => "label",
    Legend => "legend",
    Li => "li",
    Link => "link",
    Listing => "listing",
    Main => "main",
    Map => "map",
    Mark => "mark",
    Marquee => "marquee",
    Math => "math",
    Menu => "menu",
    Menuitem => "menuitem",
    Meta => "meta",
    Meter => "meter",
    Multicol => "multicol",
    Nav => "nav",
    Nextid => "nextid",
    Nobr => "nobr",
    Noembed => "noembed",
    Noframes => "noframes",
    Noscript => "noscript",
    Object => "object",
    Ol => "ol",
    Optgroup => "optgroup",
    Option => "option",
    Output => "output",
    P => "p",
    Param => "param",
    Picture => "picture",
    Plaintext => "plaintext",
    Pre => "pre",
    Progress => "progress",
    Q => "q",
    Rb => "rb",
    Rp => "rp",
    Rt => "rt",
    Rtc => "rtc",
    Ruby => "ruby",
    S => "s",
    Samp => "samp",
    Script => "script",
    Search => "search",
    Section => "section",
    Select => "select",
    Slot => "slot",
    Small => "small",
    Source => "source",
    Spacer => "spacer",
    Span => "span",
    Strike => "strike",
    Strong => "strong",
    Style => "style",
    Sub => "sub",
    Summary => "summary",
    Sup => "sup",
    Svg => "svg",
    Table => "table",
    Tbody => "tbody",
    Td => "td",
    Template => "template",
    Textarea => "textarea",
    Tfoot => "tfoot",
    Th => "th",
    Thead => "thead",
    Time => "time",
    Title => "title",
    Tr => "tr",
    Track => "track",
    Tt => "tt",
    U => "u",
    Ul => "ul",
    Var => "var",
    Video => "video",
    Wbr => "wbr",
    Xmp => "xmp",
}

/// Longest name in the vocabulary, used to size the lookup buffer.
const MAX_NAME_LEN: usize = 10;

/// Content categories an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Categories(u8);

impl Categories {
    /// No category.
    pub const NONE: Categories = Categories(0);
    /// Metadata content.
    pub const METADATA: Categories = Categories(1);
    /// Flow content.
    pub const FLOW: Categories = Categories(1 << 1);
    /// Phrasing content.
    pub const PHRASING: Categories = Categories(1 << 2);
    /// Sectioning content.
    pub const SECTIONING: Categories = Categories(1 << 3);
    /// Heading content.
    pub const HEADING: Categories = Categories(1 << 4);
    /// Embedded content.
    pub const EMBEDDED: Categories = Categories(1 << 5);
    /// Interactive content.
    pub const INTERACTIVE: Categories = Categories(1 << 6);

    const FP: Categories = Categories(Self::FLOW.0 | Self::PHRASING.0);

    /// Returns true if any category is shared.
    #[inline]
    pub fn intersects(self, other: Categories) -> bool {
        self.0 & other.0 != 0
    }
}

impl std::ops::BitOr for Categories {
    type Output = Categories;

    fn bitor(self, rhs: Categories) -> Categories {
        Categories(self.0 | rhs.0)
    }
}

/// What an element may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    /// Void: no children at all.
    Nothing,
    /// Raw text or escapable raw text only.
    Text,
    /// Phrasing content.
    Phrasing,
    /// Flow content.
    Flow,
    /// Metadata content.
    Metadata,
    /// Whatever the parent allows.
    Transparent,
    /// Only the listed elements.
    Children(&'static [ElementKind]),
    /// Anything, including unknown elements.
    Any,
}

impl Content {
    /// Categories accepted by this model, for the category-based variants.
    pub fn accepted_categories(self) -> Option<Categories> {
        match self {
            Content::Phrasing => Some(Categories::PHRASING),
            Content::Flow => Some(Categories::FLOW),
            Content::Metadata => Some(Categories::METADATA),
            _ => None,
        }
    }
}

/// Attributes valid on every element, with a short description.
pub const GLOBAL_ATTRIBUTES: &[(&str, &str)] = &[
    ("accesskey", "Keyboard shortcut to focus the element"),
    ("autocapitalize", "Automatic capitalization of user input"),
    ("autofocus", "Focus the element on page load"),
    ("class", "Space-separated list of classes"),
    ("contenteditable", "Whether the element is editable"),
    ("dir", "Text direction: ltr, rtl or auto"),
    ("draggable", "Whether the element can be dragged"),
    ("enterkeyhint", "Label for the enter key on virtual keyboards"),
    ("hidden", "Hide the element"),
    ("id", "Document-unique identifier"),
    ("inert", "Make the subtree non-interactive"),
    ("inputmode", "Virtual keyboard hint"),
    ("is", "Customized built-in element name"),
    ("itemprop", "Microdata property"),
    ("itemscope", "Microdata item scope"),
    ("itemtype", "Microdata item type"),
    ("lang", "Language of the content"),
    ("nonce", "Cryptographic nonce for CSP"),
    ("popover", "Turn the element into a popover"),
    ("slot", "Named slot to assign the element to"),
    ("spellcheck", "Whether to check spelling"),
    ("style", "Inline CSS declarations"),
    ("tabindex", "Sequential focus order"),
    ("title", "Advisory information"),
    ("translate", "Whether to translate the content"),
];

/// Obsolete presentational attributes, rejected on every element.
pub const PRESENTATIONAL_ATTRIBUTES: &[&str] = &[
    "align",
    "background",
    "bgcolor",
    "cellpadding",
    "cellspacing",
    "clear",
    "frameborder",
    "hspace",
    "marginheight",
    "marginwidth",
    "nowrap",
    "scrolling",
    "valign",
    "vspace",
];

impl ElementKind {
    /// Looks up a tag name, ignoring ASCII case.
    ///
    /// Unknown and custom names return `None`.
    pub fn classify(name: &str) -> Option<ElementKind> {
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return None;
        }
        let mut buf = [0u8; MAX_NAME_LEN];
        for (dst, src) in buf.iter_mut().zip(name.bytes()) {
            *dst = src.to_ascii_lowercase();
        }
        let lower = std::str::from_utf8(&buf[..name.len()]).ok()?;
        Self::from_lowercase(lower)
    }

    /// Void elements never have children or an end tag.
    pub fn is_void(self) -> bool {
        use ElementKind::*;
        matches!(
            self,
            Area | Base
                | Basefont
                | Bgsound
                | Br
                | Col
                | Embed
                | Frame
                | Hr
                | Img
                | Input
                | Keygen
                | Link
                | Meta
                | Param
                | Source
                | Track
                | Wbr
        )
    }

    /// The tokenizer mode used for this element's content.
    pub fn text_mode(self) -> Option<Mode> {
        use ElementKind::*;
        match self {
            Script | Style | Xmp | Iframe | Noembed | Noframes | Plaintext => Some(Mode::RawText),
            Title | Textarea => Some(Mode::RcData),
            _ => None,
        }
    }

    /// Elements whose end tag may be omitted; they close silently when an
    /// ancestor closes or the input ends.
    pub fn has_optional_end_tag(self) -> bool {
        use ElementKind::*;
        matches!(
            self,
            Html | Head
                | Body
                | P
                | Li
                | Dt
                | Dd
                | Option
                | Optgroup
                | Rb
                | Rt
                | Rtc
                | Rp
                | Tr
                | Td
                | Th
                | Thead
                | Tbody
                | Tfoot
                | Colgroup
                | Caption
        )
    }

    /// Obsolete elements that are still parsed but reported.
    pub fn is_deprecated(self) -> bool {
        use ElementKind::*;
        matches!(
            self,
            Acronym
                | Applet
                | Basefont
                | Bgsound
                | Big
                | Blink
                | Center
                | Dir
                | Font
                | Frame
                | Frameset
                | Isindex
                | Keygen
                | Listing
                | Marquee
                | Menuitem
                | Multicol
                | Nextid
                | Nobr
                | Noembed
                | Noframes
                | Param
                | Plaintext
                | Rb
                | Rtc
                | Spacer
                | Strike
                | Tt
                | Xmp
        )
    }

    /// `svg` and `math` start foreign content.
    #[inline]
    pub fn is_foreign_root(self) -> bool {
        matches!(self, ElementKind::Svg | ElementKind::Math)
    }

    /// The categories this element belongs to.
    pub fn categories(self) -> Categories {
        use ElementKind::*;
        let fp = Categories::FP;
        match self {
            Base | Title | Style => Categories::METADATA,
            Link | Meta | Noscript | Script | Template => Categories::METADATA | fp,
            A | Button | Label | Select | Textarea | Input => fp | Categories::INTERACTIVE,
            Audio | Video | Iframe | Embed | Object => {
                fp | Categories::EMBEDDED | Categories::INTERACTIVE
            }
            Canvas | Img | Math | Picture | Svg => fp | Categories::EMBEDDED,
            H1 | H2 | H3 | H4 | H5 | H6 | Hgroup => Categories::FLOW | Categories::HEADING,
            Article | Aside | Nav | Section => Categories::FLOW | Categories::SECTIONING,
            Abbr | Area | B | Bdi | Bdo | Br | Cite | Code | Data | Datalist | Del | Dfn | Em
            | I | Ins | Kbd | Map | Mark | Meter | Output | Progress | Q | Ruby | S | Samp
            | Slot | Small | Span | Strong | Sub | Sup | Time | U | Var | Wbr | Acronym | Big
            | Blink | Font | Nobr | Spacer | Strike | Tt | Marquee | Applet => fp,
            Address | Blockquote | Details | Dialog | Div | Dl | Fieldset | Figure | Footer
            | Form | Header | Hr | Main | Menu | Ol | P | Pre | Search | Table | Ul | Center
            | Dir | Listing | Xmp | Multicol | Plaintext | Isindex | Noembed => Categories::FLOW,
            Body | Caption | Col | Colgroup | Dd | Dt | Figcaption | Frame | Frameset | Head
            | Html | Legend | Li | Optgroup | Option | Param | Rb | Rp | Rt | Rtc | Source
            | Summary | Tbody | Td | Tfoot | Th | Thead | Tr | Track | Basefont | Bgsound
            | Keygen | Menuitem | Nextid | Noframes => Categories::NONE,
        }
    }

    /// The content model of this element.
    pub fn content(self) -> Content {
        use ElementKind::*;
        if self.is_void() {
            return Content::Nothing;
        }
        if self.text_mode().is_some() {
            return Content::Text;
        }
        match self {
            Html => Content::Children(&[Head, Body]),
            Head => Content::Metadata,
            Dl => Content::Children(&[Dt, Dd, Div, Script, Template]),
            Ol | Ul | Menu | Dir => Content::Children(&[Li, Script, Template]),
            Table => Content::Children(&[
                Caption, Colgroup, Thead, Tbody, Tfoot, Tr, Script, Template, Style,
            ]),
            Thead | Tbody | Tfoot => Content::Children(&[Tr, Script, Template]),
            Tr => Content::Children(&[Td, Th, Script, Template]),
            Colgroup => Content::Children(&[Col, Template]),
            Select => Content::Children(&[Option, Optgroup, Hr, Script, Template]),
            Optgroup => Content::Children(&[Option, Script, Template]),
            Datalist => Content::Children(&[Option, Script, Template]),
            Picture => Content::Children(&[Source, Img, Script, Template]),
            Hgroup => Content::Children(&[H1, H2, H3, H4, H5, H6, P]),
            Frameset => Content::Children(&[Frame, Frameset, Noframes]),
            Option => Content::Text,
            A | Ins | Del | Map | Object | Audio | Video | Canvas | Slot | Noscript | Applet => {
                Content::Transparent
            }
            Template | Svg | Math => Content::Any,
            Abbr | B | Bdi | Bdo | Cite | Code | Data | Dfn | Em | H1 | H2 | H3 | H4 | H5
            | H6 | I | Kbd | Label | Legend | Mark | Meter | Output | P | Pre | Progress | Q
            | Rb | Rp | Rt | Rtc | Ruby | S | Samp | Small | Span | Strong | Sub | Summary
            | Sup | Time | U | Var | Button | Acronym | Big | Blink | Font | Nobr | Strike
            | Tt | Marquee => Content::Phrasing,
            _ => Content::Flow,
        }
    }

    /// Attributes that must be present on this element.
    pub fn required_attributes(self) -> &'static [&'static str] {
        match self {
            ElementKind::Img => &["src"],
            ElementKind::Link => &["href", "rel"],
            ElementKind::Track => &["src"],
            ElementKind::Bdo => &["dir"],
            _ => &[],
        }
    }

    /// Element-specific attributes, offered by completions after the
    /// global ones.
    pub fn attributes(self) -> &'static [&'static str] {
        use ElementKind::*;
        match self {
            A => &[
                "href",
                "target",
                "download",
                "rel",
                "hreflang",
                "type",
                "ping",
                "referrerpolicy",
            ],
            Area => &["alt", "coords", "shape", "href", "target", "download", "rel"],
            Audio | Video => &[
                "src",
                "controls",
                "autoplay",
                "loop",
                "muted",
                "preload",
                "crossorigin",
                "poster",
                "width",
                "height",
                "playsinline",
            ],
            Base => &["href", "target"],
            Blockquote | Q | Del | Ins => &["cite", "datetime"],
            Button => &[
                "type",
                "name",
                "value",
                "disabled",
                "form",
                "formaction",
                "popovertarget",
            ],
            Canvas => &["width", "height"],
            Col | Colgroup => &["span"],
            Data => &["value"],
            Details => &["open", "name"],
            Dialog => &["open"],
            Embed => &["src", "type", "width", "height"],
            Fieldset => &["disabled", "form", "name"],
            Form => &[
                "action",
                "method",
                "enctype",
                "target",
                "novalidate",
                "autocomplete",
                "name",
            ],
            Iframe => &[
                "src",
                "srcdoc",
                "name",
                "sandbox",
                "allow",
                "width",
                "height",
                "loading",
                "referrerpolicy",
            ],
            Img => &[
                "src",
                "alt",
                "srcset",
                "sizes",
                "width",
                "height",
                "loading",
                "decoding",
                "crossorigin",
                "usemap",
                "ismap",
                "fetchpriority",
            ],
            Input => &[
                "type",
                "name",
                "value",
                "placeholder",
                "required",
                "disabled",
                "checked",
                "min",
                "max",
                "step",
                "pattern",
                "autocomplete",
                "readonly",
                "multiple",
                "accept",
                "maxlength",
                "minlength",
                "list",
                "form",
            ],
            Label => &["for"],
            Li => &["value"],
            Link => &[
                "href",
                "rel",
                "type",
                "media",
                "as",
                "crossorigin",
                "integrity",
                "sizes",
            ],
            Meta => &["name", "content", "charset", "http-equiv"],
            Meter => &["value", "min", "max", "low", "high", "optimum"],
            Object => &["data", "type", "name", "width", "height"],
            Ol => &["reversed", "start", "type"],
            Optgroup => &["disabled", "label"],
            Option => &["disabled", "label", "selected", "value"],
            Output => &["for", "form", "name"],
            Progress => &["value", "max"],
            Script => &[
                "src",
                "type",
                "async",
                "defer",
                "crossorigin",
                "integrity",
                "nomodule",
                "referrerpolicy",
            ],
            Select => &[
                "name",
                "multiple",
                "required",
                "disabled",
                "size",
                "form",
                "autocomplete",
            ],
            Slot => &["name"],
            Source => &["src", "srcset", "sizes", "type", "media"],
            Style => &["media", "blocking"],
            Td | Th => &["colspan", "rowspan", "headers", "scope", "abbr"],
            Template => &["shadowrootmode", "shadowrootdelegatesfocus"],
            Textarea => &[
                "name",
                "rows",
                "cols",
                "placeholder",
                "required",
                "disabled",
                "readonly",
                "maxlength",
                "minlength",
                "wrap",
            ],
            Time => &["datetime"],
            Track => &["src", "kind", "srclang", "label", "default"],
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_ignores_case() {
        assert_eq!(ElementKind::classify("div"), Some(ElementKind::Div));
        assert_eq!(ElementKind::classify("DIV"), Some(ElementKind::Div));
        assert_eq!(ElementKind::classify("TexTArea"), Some(ElementKind::Textarea));
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(ElementKind::classify("my-widget"), None);
        assert_eq!(ElementKind::classify("Layout"), None);
        assert_eq!(ElementKind::classify(""), None);
        assert_eq!(ElementKind::classify("blockquotes"), None);
    }

    #[test]
    fn test_max_name_len_covers_vocabulary() {
        for kind in ElementKind::ALL {
            assert!(kind.as_str().len() <= MAX_NAME_LEN, "{}", kind.as_str());
            assert_eq!(ElementKind::classify(kind.as_str()), Some(*kind));
        }
    }

    #[test]
    fn test_void_elements_have_no_content() {
        for kind in ElementKind::ALL.iter().filter(|k| k.is_void()) {
            assert_eq!(kind.content(), Content::Nothing);
        }
        assert!(ElementKind::Br.is_void());
        assert!(!ElementKind::Div.is_void());
    }

    #[test]
    fn test_text_modes() {
        assert_eq!(ElementKind::Script.text_mode(), Some(Mode::RawText));
        assert_eq!(ElementKind::Title.text_mode(), Some(Mode::RcData));
        assert_eq!(ElementKind::Div.text_mode(), None);
        assert_eq!(ElementKind::Style.content(), Content::Text);
    }

    #[test]
    fn test_categories() {
        assert!(ElementKind::Span
            .categories()
            .intersects(Categories::PHRASING));
        assert!(!ElementKind::Div.categories().intersects(Categories::PHRASING));
        assert!(ElementKind::Meta.categories().intersects(Categories::METADATA));
    }
}
