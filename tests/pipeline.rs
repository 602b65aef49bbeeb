use gosort::{render_sorted, sort_source, Change, SortOptions};

fn canonical(src: &str) -> String {
    render_sorted(src, &SortOptions::default()).unwrap()
}

const SERVER: &str = r#"// Package server runs things.
package server

import (
	"strings"
	"fmt"
)

// Run starts the server.
func (s *Server) Run() error {
	return nil
}

func main() {
	s := &Server{}
	fmt.Println(strings.ToUpper("up"), s.Run())
}

// Server holds state.
type Server struct {
	name string
}

var defaultName = "srv" // fallback

const (
	b = 2
	a = 1
)

// Run for the client.
func (c *Client) Run() error { return nil }

type Client struct{}

// end of file
"#;

#[test]
fn realistic_file_is_canonicalized() {
    let expected = r#"// Package server runs things.
package server

import (
	"fmt"
	"strings"
)

const (
	a = 1
	b = 2
)

type Client struct{}

// Server holds state.
type Server struct {
	name string
}

var defaultName = "srv" // fallback

func main() {
	s := &Server{}
	fmt.Println(strings.ToUpper("up"), s.Run())
}

// Run starts the server.
func (s *Server) Run() error {
	return nil
}

// Run for the client.
func (c *Client) Run() error { return nil }

// end of file
"#;
    assert_eq!(canonical(SERVER), expected);
}

#[test]
fn canonical_output_is_idempotent() {
    let once = canonical(SERVER);
    assert_eq!(
        sort_source(&once, &SortOptions::default()).unwrap(),
        Change::Unchanged
    );
}

#[test]
fn every_declaration_survives_reordering() {
    let out = canonical(SERVER);
    for needle in [
        "func main()",
        "func (s *Server) Run()",
        "func (c *Client) Run()",
        "type Server struct",
        "type Client struct{}",
        "var defaultName",
        "const (",
        "import (",
    ] {
        assert_eq!(out.matches(needle).count(), 1, "{needle}");
    }
}

#[test]
fn raw_strings_keep_their_bytes() {
    let src = "package p\n\nfunc z() {}\n\nvar tmpl = `\n    indented  \n`\n";
    assert_eq!(
        canonical(src),
        "package p\n\nvar tmpl = `\n    indented  \n`\n\nfunc z() {}\n"
    );
}

#[test]
fn empty_group_sorts_first_among_its_keyword() {
    let src = "package p\n\nvar x = 1\n\nvar ()\n";
    assert_eq!(canonical(src), "package p\n\nvar ()\n\nvar x = 1\n");
}

#[test]
fn file_without_declarations_is_stable() {
    let src = "package p\n";
    assert_eq!(
        sort_source(src, &SortOptions::default()).unwrap(),
        Change::Unchanged
    );
}
