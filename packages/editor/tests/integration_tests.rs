//! Integration tests for the editor crate

use pretty_assertions::assert_eq;
use serde_json::json;
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use stencil_document::{
    DocumentError, EntityRegistration, InlineEntity, NodeKey, NodeKind, NodeSelection, Point, RenderContext,
    Selection, Theme,
};
use stencil_editor::{
    Command, CommandPriority, Editor, EditorConfig, EditorError, KeyEvent, NodeMutation, KEY_BACKSPACE_COMMAND,
    NODE_KEY_ATTR, UNDO_COMMAND,
};
use stencil_html::{HtmlElement, SerializeOptions};

/// A tag rendered as one unit
#[derive(Debug, Clone, PartialEq)]
struct Tag(String);

impl InlineEntity for Tag {
    fn entity_type(&self) -> &'static str {
        "tag"
    }

    fn text_content(&self) -> String {
        format!("#{}", self.0)
    }

    fn create_dom(&self, ctx: &RenderContext<'_>) -> HtmlElement {
        let mut element = HtmlElement::new("mark").with_text(self.text_content());
        if ctx.selected {
            element.add_class(ctx.theme.class_or("selected", "selected"));
        }
        element
    }

    fn needs_dom_update(&self, previous: &dyn InlineEntity) -> bool {
        previous.downcast_ref::<Tag>() != Some(self)
    }

    fn export_json(&self) -> serde_json::Value {
        json!({"type": "tag", "version": 1, "name": self.0})
    }

    fn export_html(&self) -> HtmlElement {
        HtmlElement::new("mark").with_attr("data-tag", &self.0)
    }

    fn clone_entity(&self) -> Box<dyn InlineEntity> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn tag_registration() -> EntityRegistration {
    EntityRegistration {
        entity_type: "tag",
        import_json: |value| {
            let name = value
                .get("name")
                .and_then(|v| v.as_str())
                .ok_or_else(|| DocumentError::invalid_node("tag", "missing name"))?;
            Ok(Box::new(Tag(name.to_string())))
        },
        html_tags: &["mark"],
        import_html: |element| element.attr("data-tag").map(|name| Box::new(Tag(name.to_string())) as Box<dyn InlineEntity>),
        html_priority: 0,
    }
}

struct Fixture {
    editor: Editor,
    before: NodeKey,
    tag: NodeKey,
    after: NodeKey,
}

// [before][#urgent][after]
fn fixture() -> Fixture {
    let mut editor = Editor::new(EditorConfig::default());
    editor.register_node(tag_registration()).unwrap();
    let (before, tag, after) = editor
        .update(|tx| {
            let tree = tx.tree_mut();
            let p = tree.append(tree.root(), NodeKind::paragraph())?;
            let before = tree.append(p, NodeKind::text("before "))?;
            let tag = tree.append(p, NodeKind::entity(Tag("urgent".into())))?;
            let after = tree.append(p, NodeKind::text(" after"))?;
            Ok::<_, DocumentError>((before, tag, after))
        })
        .unwrap()
        .unwrap();
    Fixture {
        editor,
        before,
        tag,
        after,
    }
}

#[test]
fn test_theme_change_rerenders_entities() {
    let Fixture { mut editor, tag, .. } = fixture();
    editor.update(|tx| tx.tree_mut().select_node(tag, false)).unwrap();
    assert!(editor.element_by_key(tag).unwrap().has_class("selected"));
    let created = editor.render_stats().entities_created;

    editor.set_theme(Theme::default().with_class("selected", "picked"));

    let element = editor.element_by_key(tag).unwrap();
    assert!(element.has_class("picked"));
    assert!(!element.has_class("selected"));
    assert_eq!(editor.render_stats().entities_created, created + 1);
    assert_eq!(editor.config().theme.class("selected"), Some("picked"));
}

#[test]
fn test_duplicate_registration_fails() {
    let mut editor = Editor::default();
    editor.register_node(tag_registration()).unwrap();
    assert!(editor.has_node("tag"));
    assert!(matches!(
        editor.register_node(tag_registration()),
        Err(EditorError::Document(DocumentError::DuplicateNodeType(_)))
    ));
}

#[test]
fn test_entity_view_is_reused_until_it_changes() {
    let Fixture {
        mut editor, before, tag, ..
    } = fixture();
    let created = editor.render_stats().entities_created;
    assert_eq!(created, 1);

    editor
        .update(|tx| tx.tree_mut().set_text(before, "earlier "))
        .unwrap()
        .unwrap();
    assert_eq!(editor.render_stats().entities_created, 1);
    assert_eq!(editor.render_stats().entities_reused, 1);

    editor
        .update(|tx| tx.tree_mut().set_selection(Some(Selection::Node(NodeSelection::single(tag)))))
        .unwrap();
    assert_eq!(editor.render_stats().entities_created, 2);

    let element = editor.element_by_key(tag).unwrap();
    assert!(element.has_class("selected"));
    assert_eq!(element.attr("contenteditable"), Some("false"));
    assert_eq!(element.attr(NODE_KEY_ATTR), Some(tag.to_string().as_str()));
}

#[test]
fn test_default_backspace_removes_whole_entity() {
    let Fixture {
        mut editor, before, after, tag,
    } = fixture();
    editor
        .update(|tx| tx.tree_mut().set_selection(Some(Selection::caret(Point::text(after, 0)))))
        .unwrap();

    assert!(editor.dispatch_command(&KEY_BACKSPACE_COMMAND, &KeyEvent::default()));
    assert!(!editor.tree().contains(tag));
    assert_eq!(editor.read(|tree| tree.text_content()), "before  after");
    assert!(editor.tree().contains(before));
    assert!(editor.element_by_key(tag).is_none());
}

#[test]
fn test_listener_hears_entity_destroyed_on_undo_and_recreated_on_redo() {
    let Fixture { mut editor, tag, .. } = fixture();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let _ = editor.register_mutation_listener("tag", move |mutations, _| {
        log.borrow_mut().extend(mutations.iter().map(|(k, m)| (*k, *m)));
    });

    // Undo the fixture insertion
    assert!(editor.dispatch_command(&UNDO_COMMAND, &()));
    assert!(!editor.tree().contains(tag));
    assert_eq!(*seen.borrow(), vec![(tag, NodeMutation::Destroyed)]);

    seen.borrow_mut().clear();
    editor.dispatch_command(&stencil_editor::REDO_COMMAND, &());
    assert!(editor.tree().contains(tag));
    assert_eq!(*seen.borrow(), vec![(tag, NodeMutation::Created)]);
}

#[test]
fn test_history_batch_is_one_undo_step() {
    let Fixture { mut editor, before, .. } = fixture();
    let levels = editor.history().undo_levels();

    editor.begin_history_batch(Some("retitle".to_string()));
    for text in ["a", "ab", "abc"] {
        editor
            .update(|tx| tx.tree_mut().set_text(before, text))
            .unwrap()
            .unwrap();
    }
    editor.end_history_batch();

    assert_eq!(editor.history().undo_levels(), levels + 1);
    assert_eq!(editor.history().undo_description(), Some("retitle"));

    editor.dispatch_command(&UNDO_COMMAND, &());
    assert_eq!(editor.tree().text(before).unwrap().text, "before ");
}

#[test]
fn test_handler_can_intercept_default_behaviour() {
    let Fixture { mut editor, after, .. } = fixture();
    editor
        .update(|tx| tx.tree_mut().set_selection(Some(Selection::caret(Point::text(after, 0)))))
        .unwrap();

    let blocked = editor.register_command(&KEY_BACKSPACE_COMMAND, CommandPriority::High, |_, _| true);
    let text = editor.read(|tree| tree.text_content());
    assert!(editor.dispatch_command(&KEY_BACKSPACE_COMMAND, &KeyEvent::default()));
    assert_eq!(editor.read(|tree| tree.text_content()), text);

    assert!(editor.unregister(blocked));
    assert!(editor.dispatch_command(&KEY_BACKSPACE_COMMAND, &KeyEvent::default()));
    assert_ne!(editor.read(|tree| tree.text_content()), text);
}

#[test]
fn test_handlers_see_the_transaction() {
    const RENAME: Command<String> = Command::new("RENAME_TAG");
    let Fixture { mut editor, tag, .. } = fixture();

    let _ = editor.register_command(&RENAME, CommandPriority::Normal, move |name, tx| {
        if !tx.tree().contains(tag) {
            return false;
        }
        tx.set_description("rename tag");
        tx.tree_mut()
            .replace(tag, NodeKind::entity(Tag(name.clone())))
            .is_ok()
    });

    assert!(editor.dispatch_command(&RENAME, &"later".to_string()));
    assert_eq!(editor.read(|tree| tree.text_content()), "before #later after");
    assert_eq!(editor.history().undo_description(), Some("rename tag"));
}

#[test]
fn test_json_and_html_documents() {
    let Fixture { editor, .. } = fixture();
    let json = editor.to_json(false).unwrap();
    let html = editor.to_html(&SerializeOptions::default());
    assert_eq!(html, r#"<p>before <mark data-tag="urgent"></mark> after</p>"#);

    let mut from_json = Editor::default();
    from_json.register_node(tag_registration()).unwrap();
    from_json.load_json(&json).unwrap();
    assert_eq!(from_json.to_json_value(), editor.to_json_value());

    let mut from_html = Editor::default();
    from_html.register_node(tag_registration()).unwrap();
    from_html.load_html(&html).unwrap();
    assert_eq!(from_html.to_json_value(), editor.to_json_value());
    assert!(!from_html.can_undo());
}

#[test]
fn test_unknown_entity_in_json_is_rejected() {
    let Fixture { editor, .. } = fixture();
    let json = editor.to_json(false).unwrap();

    let mut bare = Editor::default();
    assert!(matches!(
        bare.load_json(&json),
        Err(EditorError::Document(DocumentError::UnknownNodeType(t))) if t == "tag"
    ));
}
