//! Navigation bar behaviour.
//!
//! [NavController] owns the navigation state (active link, mobile menu,
//! scrolled style) and decides how it changes. It never touches a document.
//! [NavScript] is the page binding: it carries the same rules as browser
//! listeners on the fixed navigation elements.

use crate::document::ids;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const HOME_HREF: &str = "#home";
pub const MENU_OPEN_LABEL: &str = "\u{2715}";
pub const MENU_CLOSED_LABEL: &str = "\u{2630}";

#[derive(Deserialize, Serialize, PartialEq, Copy, Clone, Debug)]
#[serde(default)]
pub struct NavSettings {
    /// Viewports at most this wide use the collapsible menu.
    pub mobile_breakpoint: f64,
    /// Scroll offset past which the bar takes its scrolled style.
    pub scrolled_threshold: f64,
    /// Added to scroll offset and bar height when looking for the current section.
    pub active_offset: f64,
    /// Scroll offset below which the home link is the active one.
    pub home_threshold: f64,
}

impl Default for NavSettings {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768.0,
            scrolled_threshold: 50.0,
            active_offset: 100.0,
            home_threshold: 200.0,
        }
    }
}

#[derive(PartialEq, Clone, Debug)]
pub struct Section {
    pub id: String,
    /// Offset from the top of the document.
    pub top: f64,
    pub height: f64,
    /// Whether this is the page `header` rather than a `section`.
    pub header: bool,
}

impl Section {
    fn contains(&self, position: f64) -> bool {
        position >= self.top && position < self.top + self.height
    }
}

/// Geometry of the page at one point in time.
#[derive(PartialEq, Clone, Debug, Default)]
pub struct Layout {
    pub scroll_y: f64,
    pub nav_height: f64,
    pub viewport_width: f64,
    /// In document order.
    pub sections: Vec<Section>,
}

#[derive(PartialEq, Clone, Debug)]
pub struct NavLink {
    pub href: String,
    pub active: bool,
}

/// Where a link click should scroll to.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct ScrollTarget {
    pub top: f64,
    pub smooth: bool,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum FrameRequest {
    /// Ask for an animation frame and call [NavController::on_animation_frame] in it.
    Schedule,
    /// A frame is already pending.
    Dropped,
}

#[derive(Debug)]
pub struct NavController {
    settings: NavSettings,
    links: Vec<NavLink>,
    has_toggle: bool,
    menu_open: bool,
    scrolled: bool,
    frame_pending: bool,
}

impl NavController {
    pub fn new(
        settings: NavSettings,
        hrefs: impl IntoIterator<Item = impl Into<String>>,
        has_toggle: bool,
    ) -> Self {
        let links = hrefs.into_iter().map(|x| NavLink { href: x.into(), active: false }).collect();
        Self {
            settings,
            links,
            has_toggle,
            menu_open: false,
            scrolled: false,
            frame_pending: false,
        }
    }

    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    pub fn active_href(&self) -> Option<&str> {
        self.links.iter().find(|x| x.active).map(|x| x.href.as_str())
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn scrolled(&self) -> bool {
        self.scrolled
    }

    /// Text of the mobile menu toggle button.
    pub fn toggle_label(&self) -> &'static str {
        if self.menu_open {
            MENU_OPEN_LABEL
        } else {
            MENU_CLOSED_LABEL
        }
    }

    fn is_mobile(&self, layout: &Layout) -> bool {
        layout.viewport_width <= self.settings.mobile_breakpoint
    }

    fn close_menu(&mut self) {
        self.menu_open = false;
    }

    /// Runs the initial active link and scrolled style updates.
    pub fn init(&mut self, layout: &Layout) {
        self.update_active_link(layout);
        self.update_scrolled(layout);
    }

    /// Mobile menu toggle button click.
    pub fn toggle_menu(&mut self) {
        if self.has_toggle {
            self.menu_open = !self.menu_open;
        }
    }

    /// Navigation link click.
    ///
    /// Returns where to scroll for in-page links, `None` means the click
    /// should be left to the browser.
    pub fn click_link(&mut self, href: &str, layout: &Layout) -> Option<ScrollTarget> {
        if self.is_mobile(layout) {
            self.close_menu();
        }

        let id = href.strip_prefix('#')?;
        let target = layout
            .sections
            .iter()
            .find(|x| x.id == id)
            .or_else(|| layout.sections.iter().find(|x| x.header))?;
        Some(ScrollTarget { top: target.top - layout.nav_height, smooth: true })
    }

    /// Click anywhere in the document.
    pub fn click_document(&mut self, inside_nav: bool, layout: &Layout) {
        if self.is_mobile(layout) && !inside_nav && self.menu_open {
            self.close_menu();
        }
    }

    fn activate(&mut self, href: &str) {
        for link in &mut self.links {
            link.active = link.href == href;
        }
    }

    /// Marks the link of the section under the bar as active.
    pub fn update_active_link(&mut self, layout: &Layout) {
        let position = layout.scroll_y + layout.nav_height + self.settings.active_offset;

        for section in &layout.sections {
            if section.contains(position) {
                self.activate(&format!("#{}", section.id));
            }
        }

        if layout.scroll_y < self.settings.home_threshold {
            self.activate(HOME_HREF);
        }
    }

    pub fn update_scrolled(&mut self, layout: &Layout) {
        self.scrolled = layout.scroll_y > self.settings.scrolled_threshold;
    }

    /// Scroll event. At most one update runs per animation frame, scroll
    /// events arriving while one is pending are dropped.
    pub fn on_scroll(&mut self) -> FrameRequest {
        if self.frame_pending {
            FrameRequest::Dropped
        } else {
            self.frame_pending = true;
            FrameRequest::Schedule
        }
    }

    pub fn on_animation_frame(&mut self, layout: &Layout) {
        self.update_active_link(layout);
        self.update_scrolled(layout);
        self.frame_pending = false;
    }
}

/// Listener bodies of the navigation binding. Expects `settings`, `ids` and
/// `labels` in scope.
const NAV_LISTENERS: &str = r##"  const nav = document.getElementById(ids.nav);
  const linksContainer = document.getElementById(ids.links);
  const navToggle = document.getElementById(ids.toggle);
  const navLinks = document.querySelectorAll(".nav-link");
  const sections = document.querySelectorAll("section[id], header[id]");

  const isMobile = () => window.innerWidth <= settings.mobile_breakpoint;
  const closeMenu = () => {
    linksContainer.classList.remove("open");
    if (navToggle) navToggle.textContent = labels.closed;
  };
  const activate = (href) =>
    navLinks.forEach((link) => link.classList.toggle("active", link.getAttribute("href") === href));

  if (navToggle) {
    navToggle.addEventListener("click", () => {
      const open = linksContainer.classList.toggle("open");
      navToggle.textContent = open ? labels.open : labels.closed;
    });
  }

  navLinks.forEach((link) => {
    link.addEventListener("click", (event) => {
      if (isMobile()) closeMenu();
      const href = link.getAttribute("href") || "";
      if (!href.startsWith("#")) return;
      event.preventDefault();
      const target = document.getElementById(href.substring(1)) || document.querySelector("header");
      if (!target) return;
      const top = target.getBoundingClientRect().top + window.pageYOffset - nav.offsetHeight;
      window.scrollTo({ top, behavior: "smooth" });
    });
  });

  const updateActiveLink = () => {
    const position = window.pageYOffset + nav.offsetHeight + settings.active_offset;
    sections.forEach((section) => {
      if (position >= section.offsetTop && position < section.offsetTop + section.offsetHeight) {
        activate("#" + section.id);
      }
    });
    if (window.pageYOffset < settings.home_threshold) activate(ids.home);
  };

  const updateScrolled = () =>
    nav.classList.toggle("scrolled", window.scrollY > settings.scrolled_threshold);

  let framePending = false;
  window.addEventListener("scroll", () => {
    if (framePending) return;
    framePending = true;
    window.requestAnimationFrame(() => {
      updateActiveLink();
      updateScrolled();
      framePending = false;
    });
  });

  document.addEventListener("click", (event) => {
    if (isMobile() && !nav.contains(event.target) && linksContainer.classList.contains("open")) {
      closeMenu();
    }
  });

  updateActiveLink();
  updateScrolled();
"##;

/// Browser side of the navigation bar.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct NavScript {
    pub settings: NavSettings,
}

impl NavScript {
    pub fn new(settings: NavSettings) -> Self {
        Self { settings }
    }

    /// Script that wires the navigation listeners once the document has loaded.
    pub fn bootstrap_script(&self) -> Result<String, serde_json::Error> {
        let settings = serde_json::to_string(&self.settings)?;
        let ids = json!({
            "nav": ids::NAV,
            "links": ids::NAV_LINKS,
            "toggle": ids::NAV_TOGGLE,
            "home": HOME_HREF,
        });
        let labels = json!({ "open": MENU_OPEN_LABEL, "closed": MENU_CLOSED_LABEL });
        let script = format!(
            "document.addEventListener(\"DOMContentLoaded\", () => {{\n  \
               const settings = {settings};\n  \
               const ids = {ids};\n  \
               const labels = {labels};\n\n\
             {NAV_LISTENERS}}});"
        );
        Ok(script)
    }

    /// The bootstrap script wrapped in a `<script>` element.
    pub fn script_element(&self) -> Result<String, serde_json::Error> {
        let script = self.bootstrap_script()?.replace("</", "<\\/");
        Ok(format!("<script>\n{script}\n</script>\n"))
    }
}
