#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use exl::class;

pub type Tag = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Construct,
    Clone,
    CloneAssign,
    Drop,
}

/// Records construction, cloning and dropping of [`Mock`] values, in order.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Rc<RefCell<Vec<(Call, Tag)>>>);

impl CallCounter {
    pub fn register(&self, call: Call, tag: Tag) {
        self.0.borrow_mut().push((call, tag));
    }

    pub fn count(&self, call: Call, tag: Tag) -> usize {
        self.0.borrow().iter().filter(|&&entry| entry == (call, tag)).count()
    }

    pub fn log(&self) -> Vec<(Call, Tag)> {
        self.0.borrow().clone()
    }
}

#[derive(Debug)]
pub struct Mock {
    tag: Tag,
    calls: CallCounter,
}

impl Mock {
    pub fn new(tag: Tag, calls: &CallCounter) -> Self {
        calls.register(Call::Construct, tag);
        Mock {
            tag,
            calls: calls.clone(),
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn set_tag(&mut self, tag: Tag) {
        self.tag = tag;
    }
}

impl Clone for Mock {
    fn clone(&self) -> Self {
        self.calls.register(Call::Clone, self.tag);
        Mock {
            tag: self.tag,
            calls: self.calls.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        source.calls.register(Call::CloneAssign, source.tag);
        self.tag = source.tag;
        self.calls = source.calls.clone();
    }
}

impl Drop for Mock {
    fn drop(&mut self) {
        self.calls.register(Call::Drop, self.tag);
    }
}

/// A [`Mock`] deriving from [`Mock`].
#[derive(Debug, Clone)]
pub struct DerivedMock {
    pub base: Mock,
}

impl DerivedMock {
    pub fn new(tag: Tag, calls: &CallCounter) -> Self {
        DerivedMock {
            base: Mock::new(tag, calls),
        }
    }
}

class!(Mock);
class!(DerivedMock: Mock => base);
