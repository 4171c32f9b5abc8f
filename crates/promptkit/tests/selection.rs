//! Integration tests for the selection prompt driven through the simulator.

#![forbid(unsafe_code)]

mod common;

use common::{key, last_view, msgs_from_text, run, view};
use promptkit::choice::{Item, from_strings, normalize};
use promptkit::selection::{Selection, SelectionModel};
use promptkit::template::{Value, extra_func};
use promptkit::{Cmd, KeyType, Model, Msg, PromptError};

fn selection(choices: &[&'static str], page_size: usize) -> SelectionModel<&'static str> {
    Selection::new("foo:", from_strings(choices.to_vec()))
        .page_size(page_size)
        .into_model()
}

fn visible(model: &SelectionModel<&'static str>) -> Vec<&'static str> {
    model.visible_choices().iter().map(|c| c.value).collect()
}

// ============================================================================
// Pagination
// ============================================================================

mod pagination {
    use super::*;

    const CHOICES: [&str; 4] = ["First1", "First2", "Second1", "Second2"];

    #[test]
    fn test_initial_page() {
        let sim = run(selection(&CHOICES, 2), []);
        assert_eq!(visible(sim.model()), ["First1", "First2"]);
        let view = last_view(&sim);
        assert!(view.contains("First2"));
        assert!(!view.contains("Second1"));
    }

    #[test]
    fn test_cursor_pushes_window() {
        let mut sim = run(selection(&CHOICES, 2), [key(KeyType::Down), key(KeyType::Down)]);
        assert_eq!(visible(sim.model()), ["First2", "Second1"]);
        assert_eq!(sim.model().value(), Ok(&"Second1"));

        sim.send(key(KeyType::Enter));
        sim.run_until_empty();
        assert_eq!(last_view(&sim), "foo: Second1");
    }

    #[test]
    fn test_scroll_reveals_one_choice_at_a_time() {
        let mut sim = run(selection(&CHOICES, 2), [key(KeyType::PgDown)]);
        assert_eq!(visible(sim.model()), ["First2", "Second1"]);
        assert_eq!(sim.model().value(), Ok(&"First2"));

        sim.send(key(KeyType::PgDown));
        sim.run_until_empty();
        assert_eq!(visible(sim.model()), ["Second1", "Second2"]);
        assert!(!sim.model().paginator().can_scroll_down());

        sim.send(key(KeyType::PgUp));
        sim.run_until_empty();
        assert_eq!(visible(sim.model()), ["First2", "Second1"]);
    }

    #[test]
    fn test_paginate_last() {
        let mut msgs = vec![key(KeyType::PgDown); 4];
        msgs.extend(vec![key(KeyType::Down); 5]);
        msgs.extend(vec![key(KeyType::PgDown); 4]);
        let sim = run(selection(&CHOICES, 2), msgs);
        assert_eq!(sim.model().value(), Ok(&"Second2"));
        assert_eq!(visible(sim.model()), ["Second1", "Second2"]);
    }

    #[test]
    fn test_zero_page_size_shows_everything() {
        let sim = run(selection(&CHOICES, 0), []);
        assert_eq!(visible(sim.model()), CHOICES);
        assert!(!sim.model().paginator().is_paged());
    }

    #[test]
    fn test_scroll_hints_in_view() {
        let sim = run(selection(&["a", "b", "c", "d", "e"], 3), [key(KeyType::PgDown)]);
        let view = last_view(&sim);
        let rows: Vec<&str> = view.lines().skip(2).collect();
        assert_eq!(rows, ["⇡ ▸ b", "    c", "⇣   d"]);
    }
}

// ============================================================================
// Filtering
// ============================================================================

mod filtering {
    use super::*;

    const CHOICES: [&str; 5] = ["AAA", "BBB", "CCC1", "CCC2", "DDD"];

    #[test]
    fn test_filter_narrows_choices() {
        let mut msgs = msgs_from_text("CC");
        msgs.push(key(KeyType::Down));
        let mut sim = run(selection(&CHOICES, 2), msgs);

        assert_eq!(visible(sim.model()), ["CCC1", "CCC2"]);
        assert_eq!(sim.model().paginator().page().total_matching, 2);
        assert_eq!(sim.model().value(), Ok(&"CCC2"));

        let rendered = last_view(&sim);
        assert!(rendered.contains("Filter: CC"));
        for hidden in ["AAA", "BBB", "DDD"] {
            assert!(!rendered.contains(hidden), "{hidden} in {rendered}");
        }

        sim.send(key(KeyType::Enter));
        sim.run_until_empty();
        assert!(sim.is_quit());
        assert_eq!(view(&mut sim), "foo: CCC2");
    }

    #[test]
    fn test_filter_is_case_insensitive_by_default() {
        let sim = run(selection(&CHOICES, 0), msgs_from_text("ccc"));
        assert_eq!(visible(sim.model()), ["CCC1", "CCC2"]);
    }

    #[test]
    fn test_backspace_widens_filter() {
        let mut msgs = msgs_from_text("CCC1");
        msgs.push(key(KeyType::Backspace));
        let sim = run(selection(&CHOICES, 0), msgs);
        assert_eq!(sim.model().filter_text(), "CCC");
        assert_eq!(visible(sim.model()), ["CCC1", "CCC2"]);
    }

    #[test]
    fn test_disabled_filter() {
        let model = Selection::new("foo:", from_strings(CHOICES.to_vec()))
            .filter(None)
            .page_size(2)
            .into_model();
        let mut msgs = msgs_from_text("CC");
        msgs.push(key(KeyType::Down));
        let sim = run(model, msgs);
        assert_eq!(sim.model().value(), Ok(&"BBB"));
        assert_eq!(visible(sim.model()), ["AAA", "BBB"]);
    }

    #[test]
    fn test_custom_filter() {
        let model = Selection::new("foo:", from_strings(CHOICES.to_vec()))
            .filter(Some(std::sync::Arc::new(|text: &str, c: &promptkit::choice::Choice<&str>| {
                c.string.ends_with(text)
            })))
            .into_model();
        let sim = run(model, msgs_from_text("2"));
        assert_eq!(visible(sim.model()), ["CCC2"]);
    }

    #[test]
    fn test_abort_mid_filter() {
        let mut msgs = msgs_from_text("CC");
        msgs.push(key(KeyType::Ctrl('c')));
        msgs.push(key(KeyType::Down));
        let mut sim = run(selection(&CHOICES, 2), msgs);
        assert!(sim.is_quit());
        assert_eq!(sim.pending_count(), 1);
        assert_eq!(sim.model().value(), Err(PromptError::Aborted));
        assert_eq!(view(&mut sim), "");
    }
}

// ============================================================================
// Cursor wrap-around
// ============================================================================

mod loop_cursor {
    use super::*;

    fn looping(choices: &[&'static str], page_size: usize) -> SelectionModel<&'static str> {
        Selection::new("foo:", from_strings(choices.to_vec()))
            .page_size(page_size)
            .loop_cursor(true)
            .into_model()
    }

    #[test]
    fn test_top_to_bottom() {
        let sim = run(looping(&["a", "b", "c", "d", "lastelement"], 0), [key(KeyType::Up)]);
        assert_eq!(sim.model().value(), Ok(&"lastelement"));
    }

    #[test]
    fn test_bottom_to_top() {
        let mut sim = run(
            looping(&["firstelement", "b", "c", "d", "lastelement"], 0),
            vec![key(KeyType::Down); 4],
        );
        assert_eq!(sim.model().value(), Ok(&"lastelement"));
        sim.send(key(KeyType::Down));
        sim.run_until_empty();
        assert_eq!(sim.model().value(), Ok(&"firstelement"));
    }

    #[test]
    fn test_top_to_bottom_paged() {
        let mut sim = run(looping(&["a", "b", "c", "d", "lastelement"], 3), []);
        assert!(!last_view(&sim).contains("lastelement"));
        sim.send(key(KeyType::Up));
        sim.run_until_empty();
        assert_eq!(sim.model().value(), Ok(&"lastelement"));
        assert_eq!(visible(sim.model()), ["c", "d", "lastelement"]);
    }

    #[test]
    fn test_bottom_to_top_paged() {
        let mut sim = run(
            looping(&["firstelement", "b", "c", "d", "lastelement"], 3),
            vec![key(KeyType::Down); 4],
        );
        assert!(!last_view(&sim).contains("firstelement"));
        assert_eq!(sim.model().value(), Ok(&"lastelement"));
        sim.send(key(KeyType::Down));
        sim.run_until_empty();
        assert_eq!(sim.model().value(), Ok(&"firstelement"));
        assert_eq!(sim.model().paginator().scroll_offset(), 0);
    }

    #[test]
    fn test_without_loop_cursor_stays() {
        let sim = run(selection(&["a", "b"], 0), [key(KeyType::Up)]);
        assert_eq!(sim.model().value(), Ok(&"a"));
    }
}

// ============================================================================
// Rendering
// ============================================================================

mod rendering {
    use super::*;

    #[test]
    fn test_view_is_idempotent() {
        let mut sim = run(selection(&["a", "b", "c"], 2), [key(KeyType::Down)]);
        let first = sim.model_mut().view();
        let second = sim.model_mut().view();
        assert_eq!(first, second);
        assert_eq!(sim.model().value(), Ok(&"b"));
    }

    #[test]
    fn test_wraps_to_terminal_width() {
        let model = Selection::new(
            "Choose one of these rather long options",
            from_strings(vec!["short", "another one"]),
        )
        .filter(None)
        .into_model();
        let sim = run(model, [Msg::resize(12, 24)]);
        let view = last_view(&sim);
        assert!(view.lines().count() > 3, "{view}");
        for line in view.lines() {
            assert!(line.chars().count() <= 12, "{line:?} in {view}");
        }
    }

    #[test]
    fn test_max_width_bounds_terminal_width() {
        let model = Selection::new("x", from_strings(vec!["a"]))
            .template("{{ TerminalWidth }}", "")
            .max_width(20)
            .into_model();
        let mut sim = run(model, [Msg::resize(80, 24)]);
        assert_eq!(last_view(&sim), "20");
        sim.send(Msg::resize(10, 24));
        sim.run_until_empty();
        assert_eq!(last_view(&sim), "10");
    }

    #[test]
    fn test_custom_template_bindings() {
        let template = "{{ NAllChoices }}/{{ NChoices }}/{{ PageSize }}/{{ \"paged\" if IsPaged else \"single\" }}:\
                        {% for c in AllChoices %}{{ c.Index }}={{ c.String }} {% endfor %}";
        let model = Selection::new("x", from_strings(vec!["a", "b", "c"]))
            .page_size(2)
            .template(template, "")
            .into_model();
        let sim = run(model, []);
        assert_eq!(last_view(&sim), "3/2/2/paged:0=a 1=b 2=c ");
    }

    #[test]
    fn test_extension_function() {
        let model = Selection::new("x", from_strings(vec!["a"]))
            .template_func(
                "Shout",
                extra_func(|args| Ok(Value::from(args[0].to_string().to_uppercase()))),
            )
            .template("{% for c in Choices %}{{ Shout(c.String) }}{% endfor %}", "")
            .into_model();
        let sim = run(model, []);
        assert_eq!(last_view(&sim), "A");
    }

    #[test]
    fn test_result_template_disabled() {
        let model = Selection::new("x", from_strings(vec!["a"]))
            .template(promptkit::selection::DEFAULT_TEMPLATE, "")
            .into_model();
        let mut sim = run(model, [key(KeyType::Enter)]);
        assert!(sim.is_quit());
        assert_eq!(view(&mut sim), "");
        assert_eq!(sim.model().value(), Ok(&"a"));
    }

    #[test]
    fn test_parse_error_quits_at_init() {
        let mut model = Selection::new("x", from_strings(vec!["a"]))
            .template("{% for %}", "")
            .into_model();
        assert_eq!(model.init(), Some(Cmd::Quit));
        assert!(matches!(model.err(), Some(PromptError::TemplateParse(_))));
        assert_eq!(model.view(), "");
    }
}

// ============================================================================
// Payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Server {
    host: &'static str,
    port: u16,
}

#[test]
fn test_structured_payload() {
    let choices = normalize([
        Item::Labeled("primary".to_string(), Server { host: "a.example", port: 22 }),
        Item::debug(Server { host: "b.example", port: 2222 }),
    ]);
    let model = Selection::new("Server?", choices).into_model();
    let sim = run(model, [key(KeyType::Down), key(KeyType::Enter)]);
    let server = sim.model().value().unwrap();
    assert_eq!(server.port, 2222);
    assert_eq!(
        last_view(&sim),
        r#"Server? Server { host: "b.example", port: 2222 }"#
    );
}

/// Filters and selects over any owned payload type.
fn filter_and_pick<T: std::fmt::Debug + 'static>(values: Vec<T>, filter: &str) -> SelectionModel<T> {
    let choices = normalize(values.into_iter().map(Item::debug));
    let mut msgs = msgs_from_text(filter);
    msgs.push(key(KeyType::Enter));
    run(Selection::new("Pick:", choices).into_model(), msgs).into_model()
}

#[test]
fn test_owned_payload_with_default_filter() {
    let picked = filter_and_pick(vec![String::from("alpha"), String::from("beta")], "ET");
    assert_eq!(picked.value().map(String::as_str), Ok("beta"));

    let picked = filter_and_pick(vec![vec![1u8], vec![2, 3]], "3");
    assert_eq!(picked.value(), Ok(&vec![2, 3]));
}

#[test]
fn test_events_after_quit_return_quit() {
    let mut model = selection(&["a", "b"], 0);
    model.init();
    assert_eq!(model.update(key(KeyType::Enter)), Some(Cmd::Quit));
    assert_eq!(model.update(key(KeyType::Down)), Some(Cmd::Quit));
    assert_eq!(model.value(), Ok(&"a"));
}
