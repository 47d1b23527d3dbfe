mod board;
mod service;

pub(crate) use board::ChecklistBoard;
pub(crate) use service::{
    create_task, load_checklist, save_reflection_and_complete, NewTaskForm,
};
