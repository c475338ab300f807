mod application;
mod domain;
