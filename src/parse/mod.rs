pub mod session_xml;
