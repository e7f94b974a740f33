pub mod id_newtype;
