//! tabkit headless demo.
//!
//! Builds a sample page with one host of each adapter shape, runs the
//! initialization pass, then drives it the way a browser would: load
//! events, a click, a hover, arrow scrolling, a resize and window scrolls.
//! Prints the first tab set's markup at the end.
//!
//! Usage: `tabkit-app [settings.toml|settings.json]`

mod sample;

use std::path::Path;

use anyhow::{Context, Result};

use tabkit_core::{Notification, Page, StripLayout, TabSetId, Window};
use tabkit_types::event::{Key, PageEvent};
use tabkit_types::geometry::Rect;
use tabkit_types::settings::{SettingsLayer, TabsSettings};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let global = match std::env::args().nth(1) {
        Some(path) => {
            let layer = SettingsLayer::from_file(Path::new(&path))
                .with_context(|| format!("loading settings from {path}"))?;
            log::info!("Loaded global settings from {path}");
            layer
        },
        None => SettingsLayer::default(),
    };
    let hover_delay = TabsSettings::resolve(&[&global]).hover_delay_ms;

    let sample = sample::build();
    let header = sample.header;
    let mut page = Page::new(sample.doc, sample::ADDRESS)?
        .with_global_settings(global)
        .with_fetcher(Box::new(sample::fetcher()))
        .with_layout_engine(Box::new(StripLayout::default()))
        .with_window(Window {
            width: 360.0,
            height: 640.0,
            ..Window::default()
        });
    page.document_mut()
        .set_client_rect(header, Rect::new(0.0, 0.0, 360.0, 64.0));

    page.on_notification(|n| match n {
        Notification::AfterActivation(after) => {
            log::info!("{}: panel {} active", after.tab_set, after.index);
        },
        Notification::StylesheetReady => log::info!("Stylesheet ready"),
    });

    let report = page.init(SettingsLayer::default());
    for e in &report.errors {
        log::warn!("Init: {e}");
    }
    page.stylesheet_loaded();
    page.dispatch(PageEvent::ContentReady);
    page.dispatch(PageEvent::Load);

    let first = *report.created.first().context("no tab sets were built")?;
    click(&mut page, first, 0)?;

    if let Some(&feed) = report.created.get(1) {
        let target = button(&page, feed, 1)?;
        page.dispatch(PageEvent::PointerEnter { target });
        page.advance(hover_delay);
        page.dispatch(PageEvent::PointerLeave { target });
    }

    let forward = page
        .tab_set(first)
        .context("first tab set vanished")?
        .handles()
        .forward_arrow;
    page.dispatch(PageEvent::KeyPress {
        target: forward,
        key: Key::Enter,
    });

    page.dispatch(PageEvent::Resize {
        width: 280.0,
        height: 640.0,
    });
    for y in [40.0, 80.0, 120.0] {
        page.dispatch(PageEvent::WindowScroll { scroll_y: y });
    }
    page.run_frame();

    if let Some(request) = page.window().last_scroll_request {
        log::info!("Window scroll requested to {}px", request.top);
    }
    log::info!("{page:?}");

    let root = page.tab_set(first).context("first tab set vanished")?.root();
    println!("{}", page.document().outer_html(root));
    Ok(())
}

fn button(page: &Page, id: TabSetId, index: usize) -> Result<tabkit_dom::NodeId> {
    page.tab_set(id)
        .and_then(|set| set.handles().buttons.get(index).copied())
        .with_context(|| format!("{id} has no button {index}"))
}

fn click(page: &mut Page, id: TabSetId, index: usize) -> Result<()> {
    let target = button(page, id, index)?;
    page.dispatch(PageEvent::Click { target });
    Ok(())
}
