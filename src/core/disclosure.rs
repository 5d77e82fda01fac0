/// 面板的開關狀態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Disclosure {
    id: &'static str,
    is_open: bool,
}

impl Disclosure {
    pub fn new(id: &'static str) -> Self {
        Self { id, is_open: false }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close_toggle() {
        let mut drawer = Disclosure::new("createListDrawer");
        assert!(!drawer.is_open());

        drawer.open();
        assert!(drawer.is_open());
        drawer.open();
        assert!(drawer.is_open());

        drawer.toggle();
        assert!(!drawer.is_open());
        drawer.toggle();
        drawer.close();
        assert!(!drawer.is_open());
        assert_eq!(drawer.id(), "createListDrawer");
    }
}
