//! Доступ к контроллеру из асинхронных операций
//!
//! Операция берёт контроллер на короткую синхронную транзакцию и отпускает
//! до `await`. На странице контроллер живёт в `RwSignal`, в тестах в `RefCell`.

use std::cell::RefCell;

use contracts::shared::entity::ListEntity;
use leptos::prelude::*;

use super::ListController;

pub trait ControllerHandle<E: ListEntity> {
    /// `None`, если владелец контроллера уже уничтожен (страница закрыта)
    fn mutate<R>(&self, f: impl FnOnce(&mut ListController<E>) -> R) -> Option<R>;

    fn inspect<R>(&self, f: impl FnOnce(&ListController<E>) -> R) -> Option<R>;
}

impl<E: ListEntity> ControllerHandle<E> for RwSignal<ListController<E>> {
    fn mutate<R>(&self, f: impl FnOnce(&mut ListController<E>) -> R) -> Option<R> {
        self.try_update(f)
    }

    fn inspect<R>(&self, f: impl FnOnce(&ListController<E>) -> R) -> Option<R> {
        self.try_with_untracked(f)
    }
}

impl<E: ListEntity> ControllerHandle<E> for RefCell<ListController<E>> {
    fn mutate<R>(&self, f: impl FnOnce(&mut ListController<E>) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }

    fn inspect<R>(&self, f: impl FnOnce(&ListController<E>) -> R) -> Option<R> {
        Some(f(&self.borrow()))
    }
}
