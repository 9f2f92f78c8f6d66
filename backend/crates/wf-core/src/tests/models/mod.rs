mod email;
mod identity;
mod role;
