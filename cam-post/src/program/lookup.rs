//! Temporal event lookups
//!
//! Pure functions over the loaded event sequence and the index of the event
//! being dispatched. "Next" and "previous" never include the current event.

use super::Event;

/// Event right after `index`
pub fn next_event(events: &[Event], index: usize) -> Option<&Event> {
    events.get(index.checked_add(1)?)
}

/// Event right before `index`
pub fn previous_event(events: &[Event], index: usize) -> Option<&Event> {
    events.get(index.checked_sub(1)?)
}

/// Nearest earlier event called `name`, scanning backward from `index - 1`
pub fn find_last_event<'a>(events: &'a [Event], index: usize, name: &str) -> Option<&'a Event> {
    find_nth_previous_event(events, index, name, 1)
}

/// Nearest later event called `name`, scanning forward from `index + 1`
pub fn find_nearest_event<'a>(events: &'a [Event], index: usize, name: &str) -> Option<&'a Event> {
    find_nth_next_event(events, index, name, 1)
}

/// The `n`-th (1-based) later event called `name`
pub fn find_nth_next_event<'a>(
    events: &'a [Event],
    index: usize,
    name: &str,
    n: usize,
) -> Option<&'a Event> {
    let n = n.checked_sub(1)?;
    events
        .get(index.checked_add(1)?..)?
        .iter()
        .filter(|event| event.name == name)
        .nth(n)
}

/// The `n`-th (1-based) earlier event called `name`
pub fn find_nth_previous_event<'a>(
    events: &'a [Event],
    index: usize,
    name: &str,
    n: usize,
) -> Option<&'a Event> {
    let n = n.checked_sub(1)?;
    events[..index.min(events.len())]
        .iter()
        .rev()
        .filter(|event| event.name == name)
        .nth(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ParamValue, Parameters};

    fn event(name: &str, tag: f64) -> Event {
        let mut parameters = Parameters::new();
        parameters.insert("tag".to_string(), ParamValue::Number(tag));
        Event {
            name: name.to_string(),
            parameters,
        }
    }

    fn tag(event: Option<&Event>) -> Option<f64> {
        event.and_then(|e| e.parameters.get("tag")).and_then(ParamValue::as_f64)
    }

    // A0 B1 A2 C3 A4 B5
    fn sample() -> Vec<Event> {
        vec![
            event("A", 0.0),
            event("B", 1.0),
            event("A", 2.0),
            event("C", 3.0),
            event("A", 4.0),
            event("B", 5.0),
        ]
    }

    #[test]
    fn test_neighbours() {
        let events = sample();

        assert_eq!(tag(next_event(&events, 0)), Some(1.0));
        assert_eq!(tag(previous_event(&events, 0)), None);
        assert_eq!(tag(previous_event(&events, 3)), Some(2.0));
        assert_eq!(tag(next_event(&events, 5)), None);
    }

    #[test]
    fn test_last_and_nearest_skip_current() {
        let events = sample();

        assert_eq!(tag(find_last_event(&events, 2, "A")), Some(0.0));
        assert_eq!(tag(find_nearest_event(&events, 2, "A")), Some(4.0));
        assert_eq!(tag(find_last_event(&events, 0, "A")), None);
        assert_eq!(tag(find_nearest_event(&events, 4, "A")), None);
        assert_eq!(tag(find_nearest_event(&events, 0, "Z")), None);
    }

    #[test]
    fn test_nth_lookups() {
        let events = sample();

        assert_eq!(tag(find_nth_next_event(&events, 0, "A", 1)), Some(2.0));
        assert_eq!(tag(find_nth_next_event(&events, 0, "A", 2)), Some(4.0));
        assert_eq!(tag(find_nth_next_event(&events, 0, "A", 3)), None);
        assert_eq!(tag(find_nth_previous_event(&events, 5, "A", 1)), Some(4.0));
        assert_eq!(tag(find_nth_previous_event(&events, 5, "A", 3)), Some(0.0));
        assert_eq!(tag(find_nth_previous_event(&events, 5, "A", 4)), None);
    }

    #[test]
    fn test_zero_n_and_out_of_range_index() {
        let events = sample();

        assert!(find_nth_next_event(&events, 0, "A", 0).is_none());
        assert!(find_nth_previous_event(&events, 5, "A", 0).is_none());
        assert!(find_nearest_event(&events, 99, "A").is_none());
        assert_eq!(tag(find_last_event(&events, 99, "B")), Some(5.0));
        assert!(next_event(&[], 0).is_none());
    }
}
