//! JavaScript snippets evaluated in the host tab.
//!
//! Every dynamic value is embedded as a JSON literal, so titles and paths
//! can never break out of the expression.

use serde_json::json;

use faview_protocols::BookmarkList;

pub(crate) const LOCATION: &str = "location.href";

pub(crate) const DOCUMENT_LANG: &str = "document.documentElement.getAttribute('lang')";

/// Tags the window on first use. A full load starts a new window object, so
/// the tag changes exactly when the document is replaced.
pub(crate) const DOCUMENT_ID: &str = "(() => { \
    if (!window.__faview) { \
        window.__faview = performance.timeOrigin + '-' + Math.random().toString(36).slice(2); \
    } \
    return window.__faview; \
})()";

/// Attribute set on annotated headings and on the inserted list.
const MARKER: &str = "data-faview";

/// Outcome markers returned by [`annotate_section`].
pub(crate) const ANNOTATE_OK: &str = "ok";
pub(crate) const ANNOTATE_HEADING_GONE: &str = "heading-gone";
pub(crate) const ANNOTATE_NO_SECTION: &str = "no-section";

fn selector(level: u8) -> String {
    json!(format!("h{}", level)).to_string()
}

/// `{text, annotated}` for every heading of `level`, in document order.
pub(crate) fn heading_texts(level: u8) -> String {
    format!(
        "Array.from(document.querySelectorAll({sel})).map(e => ({{ \
            text: (e.textContent || '').trim(), \
            annotated: e.hasAttribute({marker}) \
        }}))",
        sel = selector(level),
        marker = json!(MARKER),
    )
}

/// Insert the bookmark list after the heading's ancestor `depth` levels up,
/// append `suffix` to the heading and mark it, all in one evaluation.
///
/// Nothing is mutated unless the `index`-th heading still reads `text` and
/// the ancestor exists. Evaluates to one of the `ANNOTATE_*` markers.
pub(crate) fn annotate_section(
    level: u8,
    index: usize,
    text: &str,
    depth: usize,
    list: &BookmarkList,
    suffix: &str,
) -> String {
    format!(
        "(() => {{ \
            const h = document.querySelectorAll({sel})[{index}]; \
            if (!h || (h.textContent || '').trim() !== {text}) return {gone}; \
            let section = h; \
            for (let n = 0; n < {depth} && section; n++) section = section.parentNode; \
            if (!section || !section.parentNode) return {nosection}; \
            const ul = document.createElement('ul'); \
            ul.setAttribute({marker}, 'bookmarks'); \
            for (const link of {links}) {{ \
                const a = document.createElement('a'); \
                a.setAttribute('href', link.href); \
                a.textContent = link.title; \
                a.style.color = {color}; \
                const li = document.createElement('li'); \
                li.appendChild(a); \
                ul.appendChild(li); \
            }} \
            section.parentNode.insertBefore(ul, section.nextSibling); \
            h.appendChild(document.createTextNode({suffix})); \
            h.setAttribute({marker}, 'annotated'); \
            return {ok}; \
        }})()",
        sel = selector(level),
        index = index,
        text = json!(text),
        depth = depth,
        links = json!(list.links),
        color = json!(list.color),
        suffix = json!(suffix),
        marker = json!(MARKER),
        gone = json!(ANNOTATE_HEADING_GONE),
        nosection = json!(ANNOTATE_NO_SECTION),
        ok = json!(ANNOTATE_OK),
    )
}

/// Same-origin `fetch()` of `path_and_query`, resolving to
/// `{status, body}` where `body` is the parsed JSON or null.
pub(crate) fn fetch_json(path_and_query: &str) -> String {
    format!(
        "(async () => {{ \
            const res = await fetch({path}, {{ credentials: 'same-origin', headers: {{ 'Accept': 'application/json' }} }}); \
            if (!res.ok) return {{ status: res.status, body: null, invalid: false }}; \
            try {{ \
                return {{ status: res.status, body: await res.json(), invalid: false }}; \
            }} catch (e) {{ \
                return {{ status: res.status, body: null, invalid: true }}; \
            }} \
        }})()",
        path = json!(path_and_query),
    )
}
