use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::{info, warn};

pub const SITEMAP_FILE: &str = "sitemap-reviews.xml";
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Write `sitemap-reviews.xml` under `dir`, keeping any review URLs an
/// earlier run already listed. Entries are sorted so reruns are stable.
/// An unreadable or ill-formed previous file is rebuilt from `urls`.
pub fn write_reviews(dir: &Path, urls: &[String]) -> Result<PathBuf> {
    let path = dir.join(SITEMAP_FILE);
    let mut locs = previous_locs(&path);
    let before = locs.len();
    locs.extend(urls.iter().cloned());

    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    std::fs::write(&path, render_urlset(&locs)?)
        .with_context(|| format!("writing {}", path.display()))?;

    info!("Sitemap: {} urls ({} new) -> {}", locs.len(), locs.len() - before, path.display());
    Ok(path)
}

fn previous_locs(path: &Path) -> BTreeSet<String> {
    let xml = match std::fs::read_to_string(path) {
        Ok(xml) => xml,
        Err(e) if e.kind() == ErrorKind::NotFound => return BTreeSet::new(),
        Err(e) => {
            warn!("Cannot read {}: {}, rebuilding", path.display(), e);
            return BTreeSet::new();
        }
    };
    match parse_urlset(&xml) {
        Ok(urls) => urls.into_iter().collect(),
        Err(e) => {
            warn!("Ill-formed {}: {:#}, rebuilding", path.display(), e);
            BTreeSet::new()
        }
    }
}

fn render_urlset<'a>(locs: impl IntoIterator<Item = &'a String>) -> Result<Vec<u8>> {
    let mut writer = quick_xml::Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NS)])))?;
    for loc in locs {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        text_element(&mut writer, "loc", loc)?;
        text_element(&mut writer, "changefreq", "weekly")?;
        text_element(&mut writer, "priority", "0.8")?;
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

fn text_element(writer: &mut quick_xml::Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Parse a urlset XML and return all <loc> URLs.
fn parse_urlset(xml: &str) -> Result<Vec<String>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut urls = Vec::new();
    let mut in_url = false;
    let mut in_loc = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"url" => in_url = true,
                b"loc" if in_url => in_loc = true,
                _ => {}
            },
            Ok(Event::Text(e)) if in_loc => {
                urls.push(e.unescape()?.trim().to_string());
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"loc" => in_loc = false,
                b"url" => in_url = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }
    Ok(urls)
}
