//! End-to-end flows over a [`MemoryDocument`], driven only through the
//! public handlers.

use std::time::Duration;

use super::{Navigator, NavigatorBuilder};
use crate::a11y::attr;
use crate::config::{MenuConfig, SectionConfig};
use crate::menu::MenuState;
use crate::platform::{Document, MemoryDocument, NodeSpec};
use crate::section::Traversal;
use crate::types::{Event, KeyEvent, MenuId, NodeId, SearchMode};

fn item(label: &str, y: f64) -> NodeSpec {
  NodeSpec::new("li")
    .role("menuitem")
    .text(label)
    .bounds(0.0, y, 160.0, 20.0)
}

fn press(nav: &mut Navigator<MemoryDocument>, key: &str) {
  nav.handle_keydown(&KeyEvent::new(key));
}

fn drain(events: &mut async_broadcast::Receiver<Event>) -> Vec<Event> {
  std::iter::from_fn(|| events.try_recv().ok()).collect()
}

/// Trigger at the top, its container below holding `labels`.
fn menu_with(labels: &[&str], config: MenuConfig) -> (Navigator<MemoryDocument>, MenuId, NodeId, Vec<NodeId>) {
  let mut doc = MemoryDocument::new();
  let body = doc.body();
  let trigger = doc.append(body, NodeSpec::new("button").text("Menu").bounds(0.0, 0.0, 80.0, 20.0));
  let container = doc.append(body, NodeSpec::new("ul").bounds(0.0, 20.0, 160.0, 400.0));
  let mut y = 20.0;
  let mut items = Vec::new();
  for label in labels {
    items.push(doc.append(container, item(label, y)));
    y += 20.0;
  }
  let mut nav = Navigator::new(doc);
  let menu = nav.register_menu(trigger, config).expect("menu");
  (nav, menu, trigger, items)
}

#[test]
fn type_ahead_prefers_prefix_then_decays() {
  let (mut nav, menu, trigger, items) = menu_with(&["Reset", "Search", "Help"], MenuConfig::default());
  let mut events = nav.subscribe();
  nav.document_mut().focus(trigger);
  press(&mut nav, "Enter");
  assert_eq!(nav.document().active_element(), Some(items[0]));

  press(&mut nav, "s");
  press(&mut nav, "e");
  assert_eq!(nav.document().active_element(), Some(items[1]), "prefix match wins over 'Reset'");

  nav.advance(Duration::from_millis(500));
  press(&mut nav, "l");
  press(&mut nav, "p");
  assert_eq!(nav.document().active_element(), Some(items[2]), "buffer restarted after decay");

  let matched: Vec<(String, NodeId)> = drain(&mut events)
    .into_iter()
    .filter_map(|e| match e {
      Event::SearchMatched {
        menu: m,
        mode: SearchMode::Direct,
        query,
        node,
      } if m == menu => Some((query, node)),
      _ => None,
    })
    .collect();
  assert_eq!(matched.last(), Some(&("lp".to_string(), items[2])));
  assert!(matched.iter().any(|(q, n)| q == "se" && *n == items[1]));
}

#[test]
fn reopen_lands_on_last_activated_item() {
  let config = MenuConfig {
    remember_last_item: true,
    ..MenuConfig::default()
  };
  let (mut nav, menu, trigger, items) = menu_with(&["New", "Open", "Save", "Quit"], config);
  nav.document_mut().focus(trigger);
  press(&mut nav, "Enter");
  press(&mut nav, "ArrowDown");
  press(&mut nav, "ArrowDown");
  press(&mut nav, "Enter");
  assert!(nav.document().clicks().contains(&items[2]));

  press(&mut nav, "Escape");
  assert_eq!(nav.menu_state(menu), Some(MenuState::Closed));
  nav.advance(Duration::from_millis(10));
  assert_eq!(nav.document().active_element(), Some(trigger));

  press(&mut nav, "Enter");
  assert_eq!(nav.menu_state(menu), Some(MenuState::Open));
  assert_eq!(nav.document().active_element(), Some(items[2]));
}

#[test]
fn always_open_items_follow_the_menu_state() {
  let mut doc = MemoryDocument::new();
  let body = doc.body();
  let trigger = doc.append(body, NodeSpec::new("button").text("Go").bounds(0.0, 0.0, 80.0, 20.0));
  let container = doc.append(body, NodeSpec::new("ul").bounds(0.0, 20.0, 160.0, 80.0));
  let home = doc.append(container, item("Home", 20.0).attr(attr::ALWAYS_OPEN, "true"));
  let files = doc.append(container, item("Files", 40.0));
  doc.append(container, item("Exit", 60.0));
  let mut nav = Navigator::new(doc);
  let menu = nav.register_menu(trigger, MenuConfig::default()).expect("menu");

  let pinned = nav.document().parent(home);
  assert_ne!(pinned, Some(container));
  assert_eq!(nav.document().next_element_sibling(container), pinned);
  assert!(nav.document().attribute_is(home, attr::ALWAYS_OPEN, "false"));

  nav.open_menu(menu).expect("open");
  assert_eq!(nav.document().parent(home), Some(container));
  assert_eq!(nav.document().next_element_sibling(home), Some(files));
  assert!(nav.document().attribute_is(home, attr::ALWAYS_OPEN, "true"));
  assert_eq!(nav.menu_items(menu).first(), Some(&home));

  nav.close_menu(menu).expect("close");
  assert_eq!(nav.document().parent(home), pinned);
  assert!(nav.document().attribute_is(home, attr::ALWAYS_OPEN, "false"));
}

#[test]
fn search_field_filters_across_submenus() {
  let mut doc = MemoryDocument::new();
  let body = doc.body();
  let trigger = doc.append(body, NodeSpec::new("button").text("Edit").bounds(0.0, 0.0, 80.0, 20.0));
  let container = doc.append(body, NodeSpec::new("ul").bounds(0.0, 20.0, 200.0, 200.0));
  let input = doc.append(
    container,
    NodeSpec::new("input")
      .attr(attr::TYPE, "search")
      .attr(attr::USE_SEARCH, "true")
      .role("menuitem")
      .bounds(0.0, 20.0, 200.0, 20.0),
  );
  let zoom = doc.append(container, item("Zoom", 40.0));
  let advanced = doc.append(container, item("Advanced", 60.0));
  let submenu = doc.append(container, NodeSpec::new("ul").bounds(160.0, 60.0, 160.0, 60.0));
  let absolute = doc.append(submenu, item("Absolute", 60.0));
  doc.append(submenu, item("Relative", 80.0));
  doc.append(container, item("Paste", 100.0));

  let mut nav = Navigator::new(doc);
  let mut events = nav.subscribe();
  let menu = nav.register_menu(trigger, MenuConfig::default()).expect("menu");
  nav.register_menu(advanced, MenuConfig::default()).expect("submenu");
  nav.open_menu(menu).expect("open");
  assert_eq!(nav.document().active_element(), Some(zoom), "search field is skipped on open");

  nav.document_mut().focus(input);
  nav.document_mut().set_value(input, "ab");
  press(&mut nav, "b");
  assert_eq!(nav.menu_items(menu).get(1), Some(&zoom), "refresh is deferred");
  nav.advance(Duration::from_millis(50));

  assert_eq!(nav.menu_items(menu), vec![input, advanced, absolute]);
  assert!(nav.document().attribute_is(advanced, attr::SEARCH_RESULT, "true"));
  assert!(nav.document().attribute_is(absolute, attr::SEARCH_RESULT, "true"));
  assert!(!nav.document().is_visible(zoom));
  assert!(drain(&mut events).contains(&Event::SearchResults {
    menu,
    query: "ab".into(),
    results: vec![advanced, absolute],
  }));

  press(&mut nav, "ArrowDown");
  assert_eq!(nav.document().active_element(), Some(advanced));
  press(&mut nav, "ArrowDown");
  assert_eq!(nav.document().active_element(), Some(absolute));

  nav.document_mut().focus(input);
  nav.document_mut().set_value(input, "");
  press(&mut nav, "Backspace");
  nav.advance(Duration::from_millis(50));
  assert!(drain(&mut events).contains(&Event::SearchCleared { menu }));
  assert!(!nav.document().has_attribute(absolute, attr::SEARCH_RESULT));
  assert!(nav.document().is_visible(zoom));
  assert!(nav.document().is_hidden(submenu), "closed submenu hidden again");
  assert_eq!(nav.menu_items(menu).get(1), Some(&zoom));
}

/// Search field, then Home (always-open), Files and Exit.
struct SearchMenu {
  nav: Navigator<MemoryDocument>,
  menu: MenuId,
  trigger: NodeId,
  container: NodeId,
  input: NodeId,
  home: NodeId,
  files: NodeId,
  exit: NodeId,
}

fn search_menu() -> SearchMenu {
  let mut doc = MemoryDocument::new();
  let body = doc.body();
  let trigger = doc.append(body, NodeSpec::new("button").text("Go").bounds(0.0, 0.0, 80.0, 20.0));
  let container = doc.append(body, NodeSpec::new("ul").bounds(0.0, 20.0, 200.0, 100.0));
  let input = doc.append(
    container,
    NodeSpec::new("input")
      .attr(attr::TYPE, "search")
      .attr(attr::USE_SEARCH, "true")
      .role("menuitem")
      .bounds(0.0, 20.0, 200.0, 20.0),
  );
  let home = doc.append(container, item("Home", 40.0).attr(attr::ALWAYS_OPEN, "true"));
  let files = doc.append(container, item("Files", 60.0));
  let exit = doc.append(container, item("Exit", 80.0));
  let mut nav = NavigatorBuilder::new().structural_watcher(true).build(doc);
  let menu = nav.register_menu(trigger, MenuConfig::default()).expect("menu");
  SearchMenu {
    nav,
    menu,
    trigger,
    container,
    input,
    home,
    files,
    exit,
  }
}

/// Open the menu and type `query` into its search field.
fn search_for(m: &mut SearchMenu, query: &str) {
  m.nav.open_menu(m.menu).expect("open");
  m.nav.document_mut().focus(m.input);
  m.nav.document_mut().set_value(m.input, query);
  let last = query.chars().last().map(String::from).unwrap_or_default();
  press(&mut m.nav, &last);
  m.nav.advance(Duration::from_millis(50));
}

#[test]
fn escape_during_a_search_restores_the_menu() {
  let mut m = search_menu();
  let mut events = m.nav.subscribe();
  search_for(&mut m, "fi");
  assert_eq!(m.nav.menu_items(m.menu), vec![m.input, m.files]);
  assert!(m.nav.document().is_hidden(m.home));
  drain(&mut events);

  press(&mut m.nav, "Escape");
  m.nav.advance(Duration::from_millis(10));
  assert_eq!(m.nav.menu_state(m.menu), Some(MenuState::Closed));
  assert_eq!(m.nav.document().active_element(), Some(m.trigger));
  assert!(drain(&mut events).contains(&Event::SearchCleared { menu: m.menu }));

  let doc = m.nav.document();
  assert_eq!(doc.value(m.input), "");
  let pinned = doc.parent(m.home);
  assert_ne!(pinned, Some(m.container));
  assert_eq!(doc.next_element_sibling(m.container), pinned);
  assert!(!doc.is_hidden(m.home), "pinned item keeps no search visibility");
  assert!(doc.is_visible(m.home));
  for node in [m.home, m.files, m.exit] {
    assert!(!doc.has_attribute(node, attr::SEARCH_RESULT));
  }
  assert!(!doc.is_hidden(m.files) && !doc.is_hidden(m.exit));

  let body = m.nav.document().body();
  m.nav.notify_structure_changed(body);
  let doc = m.nav.document();
  assert!(!doc.is_hidden(m.files), "a closed menu is never filtered again");
  assert!(!doc.has_attribute(m.files, attr::SEARCH_RESULT));
}

#[test]
fn pending_search_refresh_is_dropped_on_close() {
  let mut m = search_menu();
  m.nav.open_menu(m.menu).expect("open");
  m.nav.document_mut().focus(m.input);
  m.nav.document_mut().set_value(m.input, "ex");
  press(&mut m.nav, "x");

  m.nav.close_menu(m.menu).expect("close");
  m.nav.advance(Duration::from_millis(100));
  let doc = m.nav.document();
  assert_eq!(doc.value(m.input), "");
  assert!(!doc.has_attribute(m.exit, attr::SEARCH_RESULT));
  assert!(!doc.is_hidden(m.home) && !doc.is_hidden(m.files));
}

#[test]
fn reopening_after_a_search_shows_every_item() {
  let mut m = search_menu();
  search_for(&mut m, "ex");
  assert_eq!(m.nav.menu_items(m.menu), vec![m.input, m.exit]);
  m.nav.close_menu(m.menu).expect("close");

  m.nav.open_menu(m.menu).expect("reopen");
  assert_eq!(m.nav.document().parent(m.home), Some(m.container));
  assert_eq!(m.nav.menu_items(m.menu), vec![m.input, m.home, m.files, m.exit]);
  assert_eq!(m.nav.document().active_element(), Some(m.home));
  let doc = m.nav.document();
  assert_eq!(doc.value(m.input), "");
  for node in [m.home, m.files, m.exit] {
    assert!(!doc.is_hidden(node));
    assert!(!doc.has_attribute(node, attr::SEARCH_RESULT));
  }
}

#[test]
fn embedded_numpad_selects_by_number() {
  let mut doc = MemoryDocument::new();
  let body = doc.body();
  let trigger = doc.append(body, NodeSpec::new("button").text("Order").bounds(0.0, 0.0, 80.0, 20.0));
  let container = doc.append(body, NodeSpec::new("ul").bounds(0.0, 20.0, 200.0, 200.0));
  let coffee = doc.append(container, item("1 Coffee", 20.0));
  doc.append(container, item("2 Tea", 40.0));
  let water = doc.append(container, item("12 Water", 60.0));
  let pad = doc.append(
    container,
    NodeSpec::new("div")
      .attr(attr::USE_NUMPAD, "true")
      .bounds(0.0, 100.0, 200.0, 100.0),
  );
  let status = doc.append(pad, NodeSpec::new("span").role("status").text("Item number"));
  let enter = doc.append(
    pad,
    NodeSpec::new("button")
      .attr(attr::BUTTON_TYPE, "Enter")
      .text("OK")
      .bounds(0.0, 180.0, 40.0, 20.0),
  );

  let mut nav = Navigator::new(doc);
  let mut events = nav.subscribe();
  let menu = nav.register_menu(trigger, MenuConfig::default()).expect("menu");
  nav.open_menu(menu).expect("open");
  assert_eq!(nav.document().active_element(), Some(coffee));

  press(&mut nav, "1");
  assert_eq!(nav.document().active_element(), Some(coffee));
  press(&mut nav, "2");
  assert_eq!(nav.document().active_element(), Some(water));
  assert_eq!(nav.document().text_content(status), "12");

  nav.handle_click(enter);
  assert!(nav.document().clicks().contains(&water));
  let committed = drain(&mut events).into_iter().any(|e| {
    e == Event::SearchMatched {
      menu,
      mode: SearchMode::Numpad,
      query: "12".into(),
      node: water,
    }
  });
  assert!(committed);
}

#[test]
fn tab_wraps_within_the_page() {
  let mut doc = MemoryDocument::new();
  let body = doc.body();
  let mut firsts = Vec::new();
  let mut roots = Vec::new();
  for (page, section, y) in [(1, 1, 0.0), (1, 2, 100.0), (1, 3, 200.0), (2, 1, 300.0), (2, 2, 400.0)] {
    let root = doc.append(body, NodeSpec::new("section").bounds(0.0, y, 400.0, 80.0));
    let first = doc.append(
      root,
      NodeSpec::new("button")
        .attr(attr::ITEM, crate::a11y::NAVIGATION_ITEM)
        .bounds(0.0, y + 10.0, 100.0, 30.0),
    );
    roots.push((root, page, section));
    firsts.push(first);
  }
  let mut nav = NavigatorBuilder::new().visibility_watcher(true).build(doc);
  let ids: Vec<_> = roots
    .iter()
    .map(|&(root, page, section)| {
      nav
        .register_section(root, SectionConfig::new(page, section))
        .expect("section")
    })
    .collect();

  nav.document_mut().focus(firsts[2]);
  nav.handle_focus(firsts[2]);
  press(&mut nav, "Tab");
  assert_eq!(nav.document().active_element(), Some(firsts[0]));

  nav.navigate(ids[0], Traversal::Backward).expect("navigate");
  assert_eq!(nav.document().active_element(), Some(firsts[2]));
}

mod proptests {
  use super::*;
  use proptest::prelude::*;

  proptest! {
    /// ArrowDown k times from the first item lands on item k mod n
    #[test]
    fn arrow_down_cycles(len in 1usize..8, presses in 0usize..24) {
      let labels: Vec<String> = (0..len).map(|i| format!("Item {i}")).collect();
      let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
      let (mut nav, menu, _, items) = menu_with(&refs, MenuConfig::default());
      nav.open_menu(menu).expect("open");
      for _ in 0..presses {
        press(&mut nav, "ArrowDown");
      }
      prop_assert_eq!(nav.document().active_element(), items.get(presses % len).copied());
    }
  }
}
