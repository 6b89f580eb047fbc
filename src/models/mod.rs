pub mod tag;
pub mod task;
pub mod user;

pub use tag::{CreateTag, DeletedTag, Tag, TagResponse, UpdateTag};
pub use task::{
    CreateTask, DeletedTask, Priority, SortKey, SortOrder, StatusFilter, Task, TaskFilter,
    TaskListResponse, TaskResponse, UpdateTask,
};
pub use user::{AuthResponse, LoginUser, RegisterUser, User, UserResponse};
