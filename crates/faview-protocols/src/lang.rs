//! Page languages and their display strings.

use std::fmt;
use std::str::FromStr;

use crate::error::InitializationError;

/// Languages the host page can be displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    Ja,
    En,
    Ko,
    ZhCn,
    ZhTw,
}

impl Lang {
    pub const ALL: [Lang; 5] = [Lang::Ja, Lang::En, Lang::Ko, Lang::ZhCn, Lang::ZhTw];

    /// Language code as used in the page's `lang` attribute and API queries.
    pub fn code(&self) -> &'static str {
        match self {
            Lang::Ja => "ja",
            Lang::En => "en",
            Lang::Ko => "ko",
            Lang::ZhCn => "zh-cn",
            Lang::ZhTw => "zh-tw",
        }
    }
}

impl FromStr for Lang {
    type Err = InitializationError;

    /// Case-insensitive; `zh-CN` and `zh-cn` are the same language.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        Lang::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or(InitializationError::UnsupportedLocale(code))
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Fixed display strings looked up per language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrase {
    /// Section title on artists with a single work type.
    Works,
    /// Section title on artists with both illustrations and manga.
    IllustsManga,
    /// Label of the bookmark count suffix.
    Favs,
}

/// Maps the active language to display strings. Stateless apart from the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Localizer {
    lang: Lang,
}

impl Localizer {
    pub fn new(lang: Lang) -> Self {
        Self { lang }
    }

    /// Build from the document root's `lang` attribute.
    pub fn from_attribute(attr: Option<&str>) -> Result<Self, InitializationError> {
        let attr = attr
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(InitializationError::MissingLocale)?;
        Ok(Self::new(attr.parse()?))
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn text(&self, phrase: Phrase) -> &'static str {
        use Phrase::*;
        match (self.lang, phrase) {
            (Lang::Ja, Works) => "作品",
            (Lang::Ja, IllustsManga) => "イラスト・マンガ",
            (Lang::Ja, Favs) => "ブックマーク",
            (Lang::En, Works) => "Works",
            (Lang::En, IllustsManga) => "Illustrations and Manga",
            (Lang::En, Favs) => "Bookmarks",
            (Lang::Ko, Works) => "작품",
            (Lang::Ko, IllustsManga) => "일러스트・만화",
            (Lang::Ko, Favs) => "북마크",
            (Lang::ZhCn, Works) => "作品",
            (Lang::ZhCn, IllustsManga) => "插画·漫画",
            (Lang::ZhCn, Favs) => "收藏",
            (Lang::ZhTw, Works) => "作品",
            (Lang::ZhTw, IllustsManga) => "插畫·漫畫",
            (Lang::ZhTw, Favs) => "收藏",
        }
    }

    /// Heading texts that identify the catalog section.
    pub fn section_titles(&self) -> [&'static str; 2] {
        [self.text(Phrase::IllustsManga), self.text(Phrase::Works)]
    }

    /// Suffix appended to the section heading, e.g. `(Bookmarks: 3)`.
    pub fn count_suffix(&self, count: usize) -> String {
        format!("({}: {})", self.text(Phrase::Favs), count)
    }
}
