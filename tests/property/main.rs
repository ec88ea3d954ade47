mod version_parse;
