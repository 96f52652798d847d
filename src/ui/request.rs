use std::cell::Cell;
use std::rc::Rc;

/// Shared between an effect and the task it spawned. The effect cleanup
/// supersedes the token, and the task drops its result instead of writing
/// state the newer effect owns.
#[derive(Clone, Debug, Default)]
pub struct RequestToken {
    superseded: Rc<Cell<bool>>,
}

impl RequestToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn supersede(&self) {
        self.superseded.set(true);
    }

    pub fn is_current(&self) -> bool {
        !self.superseded.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn clones_observe_supersede() {
        let token = RequestToken::new();
        let task = token.clone();
        assert!(task.is_current());

        token.supersede();
        assert!(!task.is_current());
        assert!(!token.is_current());
    }

    #[test]
    fn late_response_from_superseded_query_is_dropped() {
        let shown = RefCell::new(None::<u32>);
        let apply = |token: &RequestToken, page: u32| {
            if token.is_current() {
                *shown.borrow_mut() = Some(page);
            }
        };

        // Page 2 is requested, then page 3 before page 2 answers.
        let page_two = RequestToken::new();
        page_two.supersede();
        let page_three = RequestToken::new();

        apply(&page_three, 3);
        apply(&page_two, 2);
        assert_eq!(*shown.borrow(), Some(3));
    }
}
