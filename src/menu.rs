//! Small page widgets: the burger menu and the info-block accordion.

/// Which info block is expanded. At most one is open at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accordion {
    open: Option<String>,
}

impl Accordion {
    /// Clicking the open block closes it, any other block replaces it.
    pub fn toggle(&mut self, block_id: &str) {
        if self.open.as_deref() == Some(block_id) {
            self.open = None;
        } else {
            self.open = Some(block_id.to_string());
        }
    }

    pub fn is_open(&self, block_id: &str) -> bool {
        self.open.as_deref() == Some(block_id)
    }

    pub fn open_block(&self) -> Option<&str> {
        self.open.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BurgerMenu {
    pub open: bool,
}

impl BurgerMenu {
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_block_open() {
        let mut acc = Accordion::default();
        acc.toggle("delivery");
        acc.toggle("payment");
        assert!(acc.is_open("payment"));
        assert!(!acc.is_open("delivery"));
        acc.toggle("payment");
        assert_eq!(acc.open_block(), None);
    }

    #[test]
    fn burger_toggles() {
        let mut menu = BurgerMenu::default();
        menu.toggle();
        assert!(menu.open);
        menu.close();
        assert!(!menu.open);
    }
}
