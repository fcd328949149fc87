mod handler;

pub use handler::{
    FORM_PAGE, LOADING_PAGE, LOGIN_PAGE, login_page, redirect_to_root, root, serve_static,
};
